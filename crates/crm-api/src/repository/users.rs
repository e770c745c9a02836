//! 사용자 계정 Repository (PostgreSQL).

use async_trait::async_trait;
use crm_core::{Account, AccountUpdate, NewAccount};
use sqlx::PgPool;

use super::{CredentialStore, StoreError, UserStore, DUPLICATE_EMAIL};

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, role, created_at, deleted_at";

/// PostgreSQL 계정 저장소.
///
/// 이메일 유일성은 `deleted_at IS NULL` 조건의 부분 유니크 인덱스로 보장됩니다.
/// 삭제된 계정의 이메일은 재가입에 다시 쓸 수 있습니다.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 유니크 제약 위반이면 Conflict로 변환.
fn map_write_error(err: sqlx::Error) -> StoreError {
    let unique_violation = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if unique_violation {
        StoreError::Conflict(DUPLICATE_EMAIL.to_string())
    } else {
        StoreError::Database(err)
    }
}

#[async_trait]
impl CredentialStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let accounts = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE deleted_at IS NULL ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn update(&self, id: i64, update: AccountUpdate) -> Result<Option<Account>, StoreError> {
        sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                password_hash = COALESCE($5, password_hash),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.email)
        .bind(update.role.map(|role| role.as_str().to_string()))
        .bind(update.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
