//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다. 서명 키와 해셔 설정은
//! 시작 시 한 번 정해지고 이후 읽기 전용입니다.

use std::sync::Arc;

use crm_core::AuthConfig;
use sqlx::PgPool;

use crate::auth::{AuthService, PasswordHasher, TokenCodec};
use crate::error::ApiError;
use crate::repository::UserStore;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 인증 서비스 (가입, 로그인, 내 정보)
    pub auth: Arc<AuthService>,

    /// 토큰 검증기 (미들웨어용)
    pub tokens: Arc<TokenCodec>,

    /// 계정 저장소
    pub users: Arc<dyn UserStore>,

    /// 데이터베이스 연결 풀 (PostgreSQL)
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// # 인자
    /// * `auth_config` - 서명 키를 담은 인증 설정
    /// * `hasher` - 비밀번호 해셔
    /// * `store` - 계정 저장소
    pub fn new<S>(auth_config: &AuthConfig, hasher: PasswordHasher, store: Arc<S>) -> Self
    where
        S: UserStore + 'static,
    {
        let tokens = Arc::new(TokenCodec::new(auth_config));
        let auth = AuthService::new(store.clone(), hasher, tokens.clone());

        Self {
            auth: Arc::new(auth),
            tokens,
            users: store,
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 연결 설정.
    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// DB 풀 참조. 설정되지 않았으면 500.
    pub fn pool(&self) -> Result<&PgPool, ApiError> {
        self.db_pool
            .as_ref()
            .ok_or_else(|| ApiError::internal("Database not available"))
    }

    /// 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 서명 키
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-crm-api-minimum-32-chars";

/// 테스트용 AppState 생성 헬퍼.
///
/// 실제 DB 연결 없이 인메모리 계정 저장소와 고정 서명 키를 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use crate::repository::MemoryUserStore;

    let auth_config = AuthConfig::from_secret(Some(TEST_JWT_SECRET.to_string()))
        .expect("test secret is not empty");

    AppState::new(
        &auth_config,
        PasswordHasher::fast_for_tests(),
        Arc::new(MemoryUserStore::new()),
    )
}
