//! Customer Repository
//!
//! 고객 데이터베이스 연산. 삭제는 `deleted_at` 표시로 처리합니다.

use crm_core::{Customer, CustomerInput};
use sqlx::PgPool;

const CUSTOMER_COLUMNS: &str = "id, name, email, phone, company, created_at, updated_at";

/// Customer Repository
pub struct CustomerRepository;

impl CustomerRepository {
    /// 활성 고객 전체 조회
    pub async fn list(pool: &PgPool) -> Result<Vec<Customer>, sqlx::Error> {
        sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE deleted_at IS NULL ORDER BY id"
        ))
        .fetch_all(pool)
        .await
    }

    /// ID로 고객 조회
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Customer>, sqlx::Error> {
        sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// 고객 생성
    pub async fn create(pool: &PgPool, input: &CustomerInput) -> Result<Customer, sqlx::Error> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (name, email, phone, company)
            VALUES ($1, $2, $3, $4)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.company)
        .fetch_one(pool)
        .await
    }

    /// 고객 수정 (전체 필드 덮어쓰기)
    pub async fn update(
        pool: &PgPool,
        id: i64,
        input: &CustomerInput,
    ) -> Result<Option<Customer>, sqlx::Error> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers
            SET name = $2, email = $3, phone = $4, company = $5, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.company)
        .fetch_optional(pool)
        .await
    }

    /// 고객 삭제 표시
    pub async fn soft_delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE customers SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
