//! Status Repository
//!
//! 상태는 물리 삭제됩니다. 참조 중인 거래의 `status_id`는 NULL로 바뀌지 않고
//! 조회 시 상태 정보만 비게 됩니다.

use crm_core::{Status, StatusInput};
use sqlx::PgPool;

/// Status Repository
pub struct StatusRepository;

impl StatusRepository {
    pub async fn list(pool: &PgPool) -> Result<Vec<Status>, sqlx::Error> {
        sqlx::query_as::<_, Status>("SELECT id, name, color FROM statuses ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Status>, sqlx::Error> {
        sqlx::query_as::<_, Status>("SELECT id, name, color FROM statuses WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &StatusInput) -> Result<Status, sqlx::Error> {
        sqlx::query_as::<_, Status>(
            "INSERT INTO statuses (name, color) VALUES ($1, $2) RETURNING id, name, color",
        )
        .bind(&input.name)
        .bind(&input.color)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        input: &StatusInput,
    ) -> Result<Option<Status>, sqlx::Error> {
        sqlx::query_as::<_, Status>(
            "UPDATE statuses SET name = $2, color = $3 WHERE id = $1 RETURNING id, name, color",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.color)
        .fetch_optional(pool)
        .await
    }

    /// 상태 물리 삭제
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM statuses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
