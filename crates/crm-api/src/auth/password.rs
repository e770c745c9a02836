//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 비밀번호 해싱 및 검증.

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher as _, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// 비밀번호 처리 에러.
///
/// `Mismatch`와 `MalformedHash`는 클라이언트에게 같은 응답으로 보이지만,
/// 저장된 해시가 손상된 경우는 서버에서 따로 기록해야 하므로 구분합니다.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패: {0}")]
    HashingFailed(String),
    #[error("비밀번호 불일치")]
    Mismatch,
    #[error("잘못된 해시 형식: {0}")]
    MalformedHash(String),
}

/// Argon2id 비밀번호 해셔.
///
/// 작업 계수는 생성 시 고정됩니다. 검증은 해시 문자열에 기록된 파라미터를 사용하므로
/// 파라미터가 바뀌어도 기존 해시는 계속 검증됩니다.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("algorithm", &"argon2id")
            .finish()
    }
}

impl PasswordHasher {
    /// 지정한 작업 계수로 해셔 생성.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// 테스트용 저비용 해셔.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn fast_for_tests() -> Self {
        Self::with_params(Params::new(1024, 1, 1, None).expect("valid argon2 params"))
    }

    /// 비밀번호 해싱.
    ///
    /// 솔트는 매번 새로 생성됩니다.
    ///
    /// # Returns
    ///
    /// PHC 형식의 해시 문자열 (예: `$argon2id$v=19$m=19456,t=2,p=1$...`)
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// 비밀번호 검증.
    ///
    /// 평문을 복원하지 않고 저장된 해시와 비교합니다.
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), PasswordError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(HashError::Password) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hasher = PasswordHasher::fast_for_tests();
        let hash = hasher.hash("pw1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("pw1", &hash).is_ok());
        assert!(matches!(
            hasher.verify("pw2", &hash),
            Err(PasswordError::Mismatch)
        ));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = PasswordHasher::fast_for_tests();
        let a = hasher.hash("Password1").unwrap();
        let b = hasher.hash("Password1").unwrap();

        assert_ne!(a, b);
        assert!(hasher.verify("Password1", &a).is_ok());
        assert!(hasher.verify("Password1", &b).is_ok());
    }

    #[test]
    fn test_corrupt_hash_is_distinguishable() {
        let hasher = PasswordHasher::fast_for_tests();
        assert!(matches!(
            hasher.verify("password", "not-a-valid-hash"),
            Err(PasswordError::MalformedHash(_))
        ));
        assert!(matches!(
            hasher.verify("password", ""),
            Err(PasswordError::MalformedHash(_))
        ));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hasher = PasswordHasher::fast_for_tests();
        let hash = hasher.hash("plain-text-marker").unwrap();
        assert!(!hash.contains("plain-text-marker"));
    }

    #[test]
    fn test_default_hasher_verifies_light_hash() {
        // 검증은 해시에 기록된 파라미터를 따름
        let hash = PasswordHasher::fast_for_tests().hash("한글패스워드123").unwrap();
        assert!(PasswordHasher::default().verify("한글패스워드123", &hash).is_ok());
    }
}
