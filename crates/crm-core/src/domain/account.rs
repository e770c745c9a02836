//! 계정(사용자) 레코드.
//!
//! `Account`는 비밀번호 해시를 포함하므로 `Serialize`를 구현하지 않습니다.
//! 외부로 내보낼 때는 항상 해시 필드가 없는 [`AccountView`]로 변환합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

/// 저장된 계정.
#[derive(Clone)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct Account {
    /// 계정 ID
    pub id: i64,
    /// 표시 이름
    pub name: String,
    /// 이메일 (대소문자 구분, 활성 계정 간 유일)
    pub email: String,
    /// PHC 형식 비밀번호 해시
    pub password_hash: String,
    /// 역할
    pub role: Role,
    /// 생성 시각
    pub created_at: DateTime<Utc>,
    /// 삭제 표시 시각 (소프트 삭제)
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    /// 소프트 삭제 여부.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .field("deleted_at", &self.deleted_at)
            .finish()
    }
}

/// 외부 응답용 계정 표현 (비밀번호 해시 없음).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct AccountView {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[cfg_attr(feature = "utoipa-support", schema(value_type = String, example = "user"))]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
            created_at: account.created_at,
        }
    }
}

/// 새 계정 입력 (이미 해시된 비밀번호).
#[derive(Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// 계정 부분 수정.
///
/// `password_hash`는 비밀번호 해셔를 거친 값만 들어옵니다.
#[derive(Clone, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub password_hash: Option<String>,
}

impl AccountUpdate {
    /// 기존 계정에 변경 사항 적용.
    pub fn apply_to(self, account: &mut Account) {
        if let Some(name) = self.name {
            account.name = name;
        }
        if let Some(email) = self.email {
            account.email = email;
        }
        if let Some(role) = self.role {
            account.role = role;
        }
        if let Some(hash) = self.password_hash {
            account.password_hash = hash;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Account {
        Account {
            id: 7,
            name: "Kim".to_string(),
            email: "kim@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            role: Role::user(),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_view_has_no_password_field() {
        let view = AccountView::from(sample());
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "kim@example.com");
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_debug_redacts_hash() {
        let debug = format!("{:?}", sample());
        assert!(!debug.contains("$argon2id$"));
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut account = sample();
        AccountUpdate {
            role: Some(Role::admin()),
            ..Default::default()
        }
        .apply_to(&mut account);

        assert_eq!(account.name, "Kim");
        assert!(account.role.is_admin());
        assert_eq!(account.password_hash, "$argon2id$v=19$secret");
    }
}
