//! 권한 확인.
//!
//! 관리자 권한은 역할 문자열이 정확히 `admin`일 때만 인정합니다.
//! 신원이 없거나 역할이 다르면 모두 거부합니다.

use super::RequestContext;
use crate::error::ApiError;

/// 요청자가 관리자인지 확인.
pub fn is_admin(ctx: &RequestContext) -> bool {
    ctx.identity
        .as_ref()
        .map(|identity| identity.role.is_admin())
        .unwrap_or(false)
}

/// 관리자 권한 요구. 아니면 403.
pub fn require_admin(ctx: &RequestContext) -> Result<(), ApiError> {
    if is_admin(ctx) {
        Ok(())
    } else {
        Err(ApiError::Authorization(
            "관리자 권한이 필요합니다".to_string(),
        ))
    }
}
