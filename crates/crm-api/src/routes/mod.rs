//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크
//! - `/auth` - 가입, 로그인, 내 정보
//! - `/users` - 사용자 관리 (토큰 필요)
//! - `/customers` - 고객
//! - `/deals` - 거래
//! - `/statuses` - 거래 상태 (삭제는 관리자 전용)
//! - `/tags` - 태그
//! - `/comments` - 댓글 (토큰 필요)

pub mod auth;
pub mod comments;
pub mod customers;
pub mod deals;
pub mod health;
pub mod statuses;
pub mod tags;
pub mod users;

pub use auth::auth_router;
pub use comments::comments_router;
pub use customers::customers_router;
pub use deals::deals_router;
pub use health::{health_router, HealthResponse};
pub use statuses::statuses_router;
pub use tags::tags_router;
pub use users::{users_router, UpdateUserRequest};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 토큰 검증 미들웨어가 서명 키를 읽어야 하므로 상태를 미리 받습니다.
pub fn create_api_router(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/auth", auth_router(state))
        .nest("/users", users_router(state))
        .nest("/customers", customers_router())
        .nest("/deals", deals_router())
        .nest("/statuses", statuses_router(state))
        .nest("/tags", tags_router())
        .nest("/comments", comments_router(state))
}
