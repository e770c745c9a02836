//! CRM 백엔드 REST API 서버.
//!
//! Axum 기반 HTTP 서비스입니다. 인증(비밀번호 해싱, 토큰, 접근 제어)과
//! 고객/거래/상태/태그/댓글/사용자 CRUD를 제공합니다.
//!
//! # 모듈 구성
//!
//! - `auth`: 비밀번호 해셔, 토큰 코덱, 인증 서비스, 미들웨어, 권한 확인
//! - `repository`: 계정 저장소 트레이트와 구현, 엔티티 Repository
//! - `routes`: REST 엔드포인트
//! - `state`: 공유 애플리케이션 상태
//! - `openapi`: OpenAPI 문서와 Swagger UI

pub mod auth;
pub mod error;
pub mod extract;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use state::AppState;
