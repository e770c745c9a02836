//! 거래(딜) 레코드.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 거래. 조회 시 고객 이름과 상태 정보를 함께 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Deal {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub customer_id: i64,
    pub status_id: i64,
    /// 연결된 고객 이름 (고객이 삭제되었으면 None)
    pub customer_name: Option<String>,
    /// 상태 이름
    pub status_name: Option<String>,
    /// 상태 색상
    pub status_color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 거래 생성/수정 입력.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct DealInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub customer_id: i64,
    pub status_id: i64,
}
