//! Deal Repository
//!
//! 거래 조회 시 고객 이름과 상태 이름/색상을 함께 가져옵니다.

use crm_core::{Deal, DealInput};
use sqlx::PgPool;

/// 조인 포함 조회 (WHERE 절은 호출부에서 덧붙임)
const DEAL_SELECT: &str = r#"
    SELECT
        d.id, d.title, d.description, d.customer_id, d.status_id,
        c.name AS customer_name,
        s.name AS status_name,
        s.color AS status_color,
        d.created_at, d.updated_at
    FROM deals d
    LEFT JOIN customers c ON c.id = d.customer_id AND c.deleted_at IS NULL
    LEFT JOIN statuses s ON s.id = d.status_id
"#;

/// Deal Repository
pub struct DealRepository;

impl DealRepository {
    /// 활성 거래 전체 조회
    pub async fn list(pool: &PgPool) -> Result<Vec<Deal>, sqlx::Error> {
        sqlx::query_as::<_, Deal>(&format!(
            "{DEAL_SELECT} WHERE d.deleted_at IS NULL ORDER BY d.id"
        ))
        .fetch_all(pool)
        .await
    }

    /// ID로 거래 조회
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Deal>, sqlx::Error> {
        sqlx::query_as::<_, Deal>(&format!(
            "{DEAL_SELECT} WHERE d.id = $1 AND d.deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// 거래 생성 후 조인된 레코드 반환
    pub async fn create(pool: &PgPool, input: &DealInput) -> Result<Deal, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO deals (title, description, customer_id, status_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.customer_id)
        .bind(input.status_id)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// 거래 수정
    pub async fn update(
        pool: &PgPool,
        id: i64,
        input: &DealInput,
    ) -> Result<Option<Deal>, sqlx::Error> {
        let updated = sqlx::query(
            r#"
            UPDATE deals
            SET title = $2, description = $3, customer_id = $4, status_id = $5, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.customer_id)
        .bind(input.status_id)
        .execute(pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// 거래 삭제 표시
    pub async fn soft_delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE deals SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
