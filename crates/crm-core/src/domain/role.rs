//! 계정 역할.
//!
//! 역할은 자유 형식 문자열입니다. 실제로 쓰이는 값은 `user`와 `admin` 두 가지이며,
//! 권한 판단은 정확히 `admin`과 일치하는지만 봅니다 (대소문자 구분).

use serde::{Deserialize, Serialize};

/// 계정 역할 레이블.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type), sqlx(transparent))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Role(String);

impl Role {
    /// 관리자 역할 문자열
    pub const ADMIN: &'static str = "admin";
    /// 일반 사용자 역할 문자열 (기본값)
    pub const USER: &'static str = "user";

    /// 임의 문자열로 역할 생성.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// 관리자 역할.
    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    /// 일반 사용자 역할.
    pub fn user() -> Self {
        Self::new(Self::USER)
    }

    /// 요청 입력에서 역할 결정. 비어 있거나 없으면 `user`.
    pub fn from_input(label: Option<String>) -> Self {
        match label {
            Some(label) if !label.is_empty() => Self(label),
            _ => Self::user(),
        }
    }

    /// 역할 문자열.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 정확히 `admin`인지 확인.
    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::user()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_role_is_user() {
        assert_eq!(Role::default(), Role::user());
        assert_eq!(Role::from_input(None).as_str(), "user");
        assert_eq!(Role::from_input(Some(String::new())).as_str(), "user");
        assert_eq!(Role::from_input(Some("manager".to_string())).as_str(), "manager");
    }

    #[test]
    fn test_is_admin_exact_match() {
        assert!(Role::admin().is_admin());
        assert!(!Role::user().is_admin());
        assert!(!Role::new("Admin").is_admin());
        assert!(!Role::new("ADMIN").is_admin());
        assert!(!Role::new(" admin").is_admin());
    }

    #[test]
    fn test_role_serializes_as_plain_string() {
        let json = serde_json::to_string(&Role::admin()).unwrap();
        assert_eq!(json, "\"admin\"");

        let parsed: Role = serde_json::from_str("\"auditor\"").unwrap();
        assert_eq!(parsed.as_str(), "auditor");
    }
}
