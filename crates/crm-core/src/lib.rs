//! # CRM Core
//!
//! 소규모 비즈니스용 CRM 백엔드의 핵심 도메인 모델 및 공통 인프라를 제공합니다.
//!
//! - 계정(Account)과 역할(Role)
//! - 고객, 거래, 상태, 태그, 댓글 레코드
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig};
pub use domain::*;
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, LogConfig, LogFormat};
