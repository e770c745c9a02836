//! 거래 상태 (파이프라인 단계).

use serde::{Deserialize, Serialize};

/// 거래 상태. 소프트 삭제 없이 물리 삭제됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Status {
    pub id: i64,
    pub name: String,
    /// 표시 색상 (예: "#4caf50")
    pub color: String,
}

/// 상태 생성/수정 입력.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct StatusInput {
    pub name: String,
    #[serde(default)]
    pub color: String,
}
