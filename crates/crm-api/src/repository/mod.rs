//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//! 계정 저장소는 인증 서비스가 교체 가능하도록 트레이트([`CredentialStore`],
//! [`UserStore`])로 노출하고, 나머지 엔티티는 static methods 패턴을 사용합니다.

pub mod comments;
pub mod customers;
pub mod deals;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod statuses;
pub mod tags;
pub mod users;

pub use comments::CommentRepository;
pub use customers::CustomerRepository;
pub use deals::DealRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryUserStore;
pub use statuses::StatusRepository;
pub use tags::TagRepository;
pub use users::PgUserStore;

use async_trait::async_trait;
use crm_core::{Account, AccountUpdate, NewAccount};

/// 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 유일성 제약 위반 (예: 이메일 중복)
    #[error("{0}")]
    Conflict(String),
    #[error("데이터베이스 오류: {0}")]
    Database(#[from] sqlx::Error),
}

/// 인증에 필요한 최소 계정 저장소.
///
/// 조회는 소프트 삭제되지 않은 계정만 대상으로 합니다.
/// `insert`는 활성 계정 간 이메일 유일성을 원자적으로 보장해야 하며,
/// 중복이면 [`StoreError::Conflict`]를 반환합니다.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError>;

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;
}

/// 사용자 관리용 계정 저장소.
#[async_trait]
pub trait UserStore: CredentialStore {
    /// 활성 계정 전체 (ID 순).
    async fn list(&self) -> Result<Vec<Account>, StoreError>;

    /// 부분 수정. 대상이 없으면 `None`.
    async fn update(&self, id: i64, update: AccountUpdate) -> Result<Option<Account>, StoreError>;

    /// 소프트 삭제. 활성 계정이 있었으면 `true`.
    async fn soft_delete(&self, id: i64) -> Result<bool, StoreError>;
}

/// 이메일 중복 메시지.
pub(crate) const DUPLICATE_EMAIL: &str = "이미 등록된 이메일입니다";
