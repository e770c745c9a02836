//! 통합 API 에러 응답 타입.
//!
//! 모든 핸들러는 [`ApiError`]를 반환하고, 응답 본문은 항상 [`ApiErrorResponse`]
//! 형식입니다. 인증 실패의 세부 사유나 내부 에러 내용은 로그에만 남고
//! 클라이언트에는 고정된 메시지만 전달됩니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

use crate::auth::TokenError;
use crate::repository::StoreError;

/// 통합 API 에러 응답.
///
/// ```json
/// {
///   "code": "INVALID_CREDENTIALS",
///   "message": "이메일 또는 비밀번호가 올바르지 않습니다"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "VALIDATION_ERROR", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: impl Into<String>, message: impl Into<String>, details: Value) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// 자격 증명 불일치 사유 (로그 전용).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFailure {
    /// 해당 이메일의 활성 계정 없음
    UnknownEmail,
    /// 비밀번호 불일치
    WrongPassword,
    /// 저장된 해시를 해석할 수 없음
    CorruptHash,
}

/// 인증 실패 종류.
#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    #[error("Authorization 헤더 없음")]
    MissingToken,
    #[error("토큰 검증 실패: {0}")]
    InvalidToken(#[from] TokenError),
    #[error("자격 증명 불일치: {0:?}")]
    InvalidCredentials(CredentialFailure),
}

/// 핸들러 공통 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 요청 형식 오류 (400)
    #[error("잘못된 요청: {0}")]
    Validation(String),
    /// 필드 검증 실패 (400)
    #[error("입력 검증 실패: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),
    /// 중복 등 요청 충돌 (400)
    #[error("요청 충돌: {0}")]
    Conflict(String),
    /// 인증 실패 (401)
    #[error("인증 실패: {0}")]
    Authentication(#[from] AuthFailure),
    /// 권한 부족 (403)
    #[error("권한 부족: {0}")]
    Authorization(String),
    /// 대상 없음 (404)
    #[error("찾을 수 없음: {0}")]
    NotFound(String),
    /// 내부 오류 (500). 내용은 로그로만 남음
    #[error("내부 오류: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self::Internal(detail.to_string())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// HTTP 상태 코드.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidInput(_) | Self::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 클라이언트에 전달되는 응답 본문.
    pub fn to_response_body(&self) -> ApiErrorResponse {
        match self {
            Self::Validation(msg) => ApiErrorResponse::new("VALIDATION_ERROR", msg.clone()),
            Self::InvalidInput(errors) => ApiErrorResponse::with_details(
                "VALIDATION_ERROR",
                "입력값이 올바르지 않습니다",
                serde_json::to_value(errors).unwrap_or(Value::Null),
            ),
            Self::Conflict(msg) => ApiErrorResponse::new("CONFLICT", msg.clone()),
            Self::Authentication(AuthFailure::MissingToken) => {
                ApiErrorResponse::new("MISSING_TOKEN", "인증 토큰이 필요합니다")
            }
            Self::Authentication(AuthFailure::InvalidToken(_)) => {
                ApiErrorResponse::new("INVALID_TOKEN", "유효하지 않은 토큰")
            }
            Self::Authentication(AuthFailure::InvalidCredentials(_)) => ApiErrorResponse::new(
                "INVALID_CREDENTIALS",
                "이메일 또는 비밀번호가 올바르지 않습니다",
            ),
            Self::Authorization(msg) => ApiErrorResponse::new("FORBIDDEN", msg.clone()),
            Self::NotFound(msg) => ApiErrorResponse::new("NOT_FOUND", msg.clone()),
            Self::Internal(_) => ApiErrorResponse::new("INTERNAL_ERROR", "내부 서버 오류"),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Database(e) => Self::internal(e),
        }
    }
}

/// 외래 키 위반 시 응답 메시지
const MISSING_REFERENCE: &str = "참조하는 항목을 찾을 수 없습니다";

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        // 존재하지 않는 고객/거래를 가리키는 쓰기는 404
        let missing_reference = err
            .as_database_error()
            .is_some_and(|db| db.is_foreign_key_violation());

        if missing_reference {
            debug!(error = %err, "외래 키 위반");
            Self::not_found(MISSING_REFERENCE)
        } else {
            Self::internal(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(detail) => error!(detail = %detail, "요청 처리 중 내부 오류"),
            Self::Authentication(reason) => warn!(reason = %reason, "인증 거부"),
            _ => {}
        }

        (self.status(), Json(self.to_response_body())).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(AuthFailure::MissingToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Authorization("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_credential_failures_share_one_body() {
        let bodies: Vec<String> = [
            CredentialFailure::UnknownEmail,
            CredentialFailure::WrongPassword,
            CredentialFailure::CorruptHash,
        ]
        .into_iter()
        .map(|reason| {
            let err = ApiError::from(AuthFailure::InvalidCredentials(reason));
            serde_json::to_string(&err.to_response_body()).unwrap()
        })
        .collect();

        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[1], bodies[2]);
    }

    #[test]
    fn test_token_failures_share_one_body() {
        let expired = ApiError::from(AuthFailure::from(TokenError::Expired)).to_response_body();
        let forged = ApiError::from(AuthFailure::from(TokenError::BadSignature)).to_response_body();
        assert_eq!(expired.code, forged.code);
        assert_eq!(expired.message, forged.message);
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let body = ApiError::internal("connection refused at 10.0.0.5").to_response_body();
        assert!(!body.message.contains("10.0.0.5"));
        assert_eq!(body.code, "INTERNAL_ERROR");
    }

    #[test]
    fn test_json_skips_empty_details() {
        let json = serde_json::to_string(&ApiErrorResponse::new("NOT_FOUND", "없음")).unwrap();
        assert!(!json.contains("details"));
        assert!(json.contains(r#""code":"NOT_FOUND""#));
    }

    #[derive(Debug)]
    struct FakeDbError {
        foreign_key: bool,
    }

    impl std::fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "fake database error")
        }
    }

    impl std::error::Error for FakeDbError {}

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "fake database error"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.foreign_key {
                sqlx::error::ErrorKind::ForeignKeyViolation
            } else {
                sqlx::error::ErrorKind::Other
            }
        }
    }

    #[test]
    fn test_foreign_key_violation_is_not_found() {
        let err = sqlx::Error::Database(Box::new(FakeDbError { foreign_key: true }));
        let api = ApiError::from(err);
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
        assert_eq!(api.to_response_body().message, MISSING_REFERENCE);

        let other =
            ApiError::from(sqlx::Error::Database(Box::new(FakeDbError { foreign_key: false })));
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::from(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
