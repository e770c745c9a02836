//! Tag Repository

use crm_core::{Tag, TagInput};
use sqlx::PgPool;

/// Tag Repository
pub struct TagRepository;

impl TagRepository {
    pub async fn list(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE deleted_at IS NULL ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT id, name FROM tags WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(pool: &PgPool, input: &TagInput) -> Result<Tag, sqlx::Error> {
        sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES ($1) RETURNING id, name")
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        input: &TagInput,
    ) -> Result<Option<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "UPDATE tags SET name = $2 WHERE id = $1 AND deleted_at IS NULL RETURNING id, name",
        )
        .bind(id)
        .bind(&input.name)
        .fetch_optional(pool)
        .await
    }

    pub async fn soft_delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE tags SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
