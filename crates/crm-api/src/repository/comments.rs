//! Comment Repository
//!
//! 작성자 조인은 삭제된 계정도 포함합니다. 계정이 소프트 삭제되어도
//! 댓글의 작성자 이름은 유지됩니다.

use crm_core::{Comment, CommentInput};
use sqlx::PgPool;

const COMMENT_SELECT: &str = r#"
    SELECT
        cm.id, cm.deal_id, cm.user_id, cm.content,
        u.name AS author_name,
        d.title AS deal_title,
        cm.created_at
    FROM comments cm
    LEFT JOIN users u ON u.id = cm.user_id
    LEFT JOIN deals d ON d.id = cm.deal_id AND d.deleted_at IS NULL
"#;

/// Comment Repository
pub struct CommentRepository;

impl CommentRepository {
    pub async fn list(pool: &PgPool) -> Result<Vec<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            "{COMMENT_SELECT} WHERE cm.deleted_at IS NULL ORDER BY cm.id"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            "{COMMENT_SELECT} WHERE cm.id = $1 AND cm.deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// 댓글 생성. 작성자는 인증된 요청자.
    pub async fn create(
        pool: &PgPool,
        author_id: i64,
        input: &CommentInput,
    ) -> Result<Comment, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO comments (deal_id, user_id, content) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(input.deal_id)
        .bind(author_id)
        .bind(&input.content)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// 댓글 수정 (작성자는 바뀌지 않음)
    pub async fn update(
        pool: &PgPool,
        id: i64,
        input: &CommentInput,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let updated = sqlx::query(
            r#"
            UPDATE comments SET deal_id = $2, content = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(input.deal_id)
        .bind(&input.content)
        .execute(pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn soft_delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE comments SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
