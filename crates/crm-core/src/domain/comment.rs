//! 거래에 달리는 댓글.
//!
//! 작성자는 소프트 삭제된 계정일 수 있습니다. 댓글 이력을 보존하기 위해
//! 계정은 물리적으로 삭제되지 않습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 댓글. 조회 시 작성자 이름과 거래 제목을 함께 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Comment {
    pub id: i64,
    pub deal_id: i64,
    /// 작성자 계정 ID
    pub user_id: i64,
    pub content: String,
    pub author_name: Option<String>,
    pub deal_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 댓글 생성/수정 입력. 작성자는 인증된 요청자로 정해집니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CommentInput {
    pub deal_id: i64,
    pub content: String,
}
