//! 코어 에러 타입.

use thiserror::Error;

/// 설정 로드 및 프로세스 초기화 중 발생하는 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 소스 파싱/역직렬화 실패
    #[error("설정 에러: {0}")]
    Config(#[from] config::ConfigError),

    /// 토큰 서명 키 누락. 프로세스를 시작하면 안 됨
    #[error("JWT_SECRET 환경 변수가 설정되지 않았습니다")]
    MissingJwtSecret,

    /// 잘못된 설정 값
    #[error("잘못된 설정 값: {0}")]
    InvalidValue(String),

    /// 로깅 초기화 실패
    #[error("로깅 초기화 실패: {0}")]
    Logging(String),
}

/// 코어 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// 시작 단계에서 즉시 종료해야 하는 에러인지 확인합니다.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::MissingJwtSecret | CoreError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_is_fatal() {
        assert!(CoreError::MissingJwtSecret.is_fatal());
        assert!(!CoreError::Logging("already set".to_string()).is_fatal());
    }

    #[test]
    fn test_error_message_mentions_variable() {
        let msg = CoreError::MissingJwtSecret.to_string();
        assert!(msg.contains("JWT_SECRET"));
    }
}
