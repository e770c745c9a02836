//! JWT 세션 토큰 처리.
//!
//! HS256 서명, 발급 후 24시간 고정 만료. 서버 측 세션 상태가 없으므로
//! 발급된 토큰은 만료 전까지 무효화할 수 없습니다.

use chrono::{DateTime, Duration, Utc};
use crm_core::{Account, AuthConfig, Role};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use super::VerifiedIdentity;

/// 토큰 유효 시간 (시간 단위, 호출별 변경 불가)
pub const TOKEN_TTL_HOURS: i64 = 24;

/// JWT 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// 계정 ID
    pub user_id: i64,
    /// 이메일
    pub email: String,
    /// 발급 시점의 역할
    pub role: Role,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 계정에서 Claims 생성. 만료는 `issued_at + 24h`.
    pub fn for_account(account: &Account, issued_at: DateTime<Utc>) -> Self {
        Self {
            user_id: account.id,
            email: account.email.clone(),
            role: account.role.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        }
    }

    /// 주어진 시각에 만료되었는지 확인 (만료 시각 포함).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// 만료 시각.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// 요청 컨텍스트에 붙일 검증된 신원.
    pub fn identity(&self) -> VerifiedIdentity {
        VerifiedIdentity {
            id: self.user_id,
            role: self.role.clone(),
        }
    }
}

/// 토큰 처리 에러.
///
/// 검증 실패 사유는 내부 진단용입니다. 클라이언트에는 하나의 응답으로만 노출됩니다.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("서명이 일치하지 않습니다")]
    BadSignature,
    #[error("잘못된 토큰 형식: {0}")]
    Malformed(String),
}

/// 토큰 발급/검증기.
///
/// 프로세스 전역 서명 키 하나로 생성되며 이후 읽기 전용입니다.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// 인증 설정에서 생성.
    pub fn new(config: &AuthConfig) -> Self {
        Self::from_secret(config.secret_bytes())
    }

    /// 서명 키 바이트에서 생성.
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // 만료는 verify_at에서 직접 판단 (만료 시각과 같아도 거부)
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Claims를 서명된 토큰 문자열로 인코딩.
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(TokenError::Encoding)
    }

    /// 현재 시각 기준으로 토큰 검증.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// 주어진 시각 기준으로 토큰 검증.
    ///
    /// 서명 불일치, 형식 오류, `now >= exp` 모두 거부합니다.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                other => TokenError::Malformed(format!("{:?}", other)),
            }
        })?;

        if data.claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-testing-minimum-32-chars";

    fn account(role: Role) -> Account {
        Account {
            id: 42,
            name: "Park".to_string(),
            email: "a@x.com".to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let codec = TokenCodec::from_secret(TEST_SECRET);
        let claims = Claims::for_account(&account(Role::user()), Utc::now());

        let token = codec.issue(&claims).unwrap();
        assert!(!token.is_empty());

        let decoded = codec.verify(&token).unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.identity().id, 42);
        assert_eq!(decoded.identity().role, Role::user());
    }

    #[test]
    fn test_expiry_is_24_hours_after_issue() {
        let codec = TokenCodec::from_secret(TEST_SECRET);
        let issued_at = Utc::now();
        let token = codec
            .issue(&Claims::for_account(&account(Role::admin()), issued_at))
            .unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert!((claims.iat - issued_at.timestamp()).abs() <= 1);
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = TokenCodec::from_secret(TEST_SECRET);
        let issued_at = Utc::now() - Duration::hours(25);
        let token = codec
            .issue(&Claims::for_account(&account(Role::user()), issued_at))
            .unwrap();

        assert!(matches!(codec.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_rejected_exactly_at_expiry() {
        let codec = TokenCodec::from_secret(TEST_SECRET);
        let issued_at = Utc::now();
        let claims = Claims::for_account(&account(Role::user()), issued_at);
        let token = codec.issue(&claims).unwrap();

        let just_before = issued_at + Duration::hours(TOKEN_TTL_HOURS) - Duration::seconds(1);
        let at_expiry = issued_at + Duration::hours(TOKEN_TTL_HOURS);

        assert!(codec.verify_at(&token, just_before).is_ok());
        assert!(matches!(
            codec.verify_at(&token, at_expiry),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let codec = TokenCodec::from_secret(TEST_SECRET);
        let other = TokenCodec::from_secret(b"wrong-secret-key-for-testing-minimum-32-chars");
        let token = codec
            .issue(&Claims::for_account(&account(Role::user()), Utc::now()))
            .unwrap();

        assert!(matches!(other.verify(&token), Err(TokenError::BadSignature)));
    }

    #[test]
    fn test_malformed_token() {
        let codec = TokenCodec::from_secret(TEST_SECRET);
        assert!(codec.verify("invalid.token.here").is_err());
        assert!(codec.verify("").is_err());
        assert!(codec.verify("Bearer abc").is_err());
    }

    proptest! {
        #[test]
        fn single_byte_payload_change_is_rejected(position in 0usize..64, replacement in b'a'..=b'z') {
            let codec = TokenCodec::from_secret(TEST_SECRET);
            let token = codec
                .issue(&Claims::for_account(&account(Role::user()), Utc::now()))
                .unwrap();

            let header_end = token.find('.').unwrap();
            let payload_end = token.rfind('.').unwrap();
            let index = header_end + 1 + position % (payload_end - header_end - 1);

            let mut bytes = token.clone().into_bytes();
            prop_assume!(bytes[index] != replacement);
            bytes[index] = replacement;
            let tampered = String::from_utf8(bytes).unwrap();

            prop_assert!(codec.verify(&tampered).is_err());
        }
    }
}
