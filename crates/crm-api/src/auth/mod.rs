//! 인증 및 권한 부여.
//!
//! # 구성 요소
//!
//! - [`PasswordHasher`]: Argon2id 비밀번호 해싱
//! - [`TokenCodec`]: JWT 발급/검증 (24시간 만료)
//! - [`AuthService`]: 가입, 로그인, 내 정보
//! - [`require_auth`]: 보호된 라우트용 미들웨어
//! - [`require_admin`]: 관리자 권한 확인

mod jwt;
mod middleware;
mod password;
mod roles;
mod service;

pub use jwt::{Claims, TokenCodec, TokenError, TOKEN_TTL_HOURS};
pub use middleware::{extract_token, require_auth, RequestContext, VerifiedIdentity};
pub use password::{PasswordError, PasswordHasher};
pub use roles::{is_admin, require_admin};
pub use service::{AuthService, LoginRequest, LoginResponse, RegisterRequest};
