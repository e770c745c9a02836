//! 접근 제어 미들웨어.
//!
//! 보호된 라우트 앞에서 Authorization 헤더의 토큰을 검증하고, 검증된 신원을
//! 요청 확장(extensions)에 붙입니다. 핸들러는 [`RequestContext`] 추출기로
//! 신원을 읽습니다.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use crm_core::Role;
use tracing::debug;

use super::TokenError;
use crate::error::{ApiError, AuthFailure};
use crate::state::AppState;

/// 토큰 검증을 통과한 요청자.
///
/// 역할은 토큰 발급 시점의 값입니다. 이후 역할이 바뀌어도 토큰이 만료될
/// 때까지는 이 값이 쓰입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub id: i64,
    pub role: Role,
}

/// 요청별 인증 컨텍스트.
///
/// 미들웨어를 거치지 않은 요청에서는 `identity`가 `None`입니다.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub identity: Option<VerifiedIdentity>,
}

impl RequestContext {
    pub fn authenticated(identity: VerifiedIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// 신원 요구. 없으면 401.
    pub fn require_identity(&self) -> Result<&VerifiedIdentity, ApiError> {
        self.identity
            .as_ref()
            .ok_or(ApiError::Authentication(AuthFailure::MissingToken))
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            identity: parts.extensions.get::<VerifiedIdentity>().cloned(),
        })
    }
}

/// Authorization 헤더 값에서 토큰 부분 추출.
///
/// `Bearer ` 접두사는 있으면 제거하고, 없으면 값 전체를 토큰으로 봅니다.
pub fn extract_token(header_value: &str) -> &str {
    header_value
        .strip_prefix("Bearer ")
        .unwrap_or(header_value)
}

/// 보호된 라우트용 인증 미들웨어.
///
/// 헤더가 없거나 비어 있거나 토큰 검증에 실패하면 401을 반환하고 핸들러는 실행되지 않습니다.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthFailure::MissingToken)?;

    let header = header.to_str().map_err(|_| {
        AuthFailure::InvalidToken(TokenError::Malformed(
            "non-ascii authorization header".to_string(),
        ))
    })?;

    // 빈 헤더는 헤더가 없는 것과 같음
    if header.trim().is_empty() {
        return Err(AuthFailure::MissingToken.into());
    }

    let claims = state
        .tokens
        .verify(extract_token(header))
        .map_err(AuthFailure::InvalidToken)?;

    debug!(user_id = claims.user_id, "토큰 검증 완료");
    request.extensions_mut().insert(claims.identity());

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_prefix_optional() {
        assert_eq!(extract_token("Bearer abc.def.ghi"), "abc.def.ghi");
        assert_eq!(extract_token("abc.def.ghi"), "abc.def.ghi");
        // 접두사는 대소문자 구분
        assert_eq!(extract_token("bearer abc"), "bearer abc");
        assert_eq!(extract_token("Bearer "), "");
    }

    #[test]
    fn test_context_without_identity() {
        let ctx = RequestContext::default();
        assert!(ctx.require_identity().is_err());

        let ctx = RequestContext::authenticated(VerifiedIdentity {
            id: 3,
            role: Role::user(),
        });
        assert_eq!(ctx.require_identity().unwrap().id, 3);
    }
}
