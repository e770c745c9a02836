//! 거래 API 라우트
//!
//! # 엔드포인트
//!
//! - `GET /deals` - 거래 목록 (고객 이름, 상태 포함)
//! - `GET /deals/{id}` - 거래 조회
//! - `POST /deals` - 거래 생성
//! - `PUT /deals/{id}` - 거래 수정
//! - `DELETE /deals/{id}` - 거래 삭제

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use crm_core::{Deal, DealInput};
use tracing::info;

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::repository::DealRepository;
use crate::state::AppState;

const NOT_FOUND: &str = "거래를 찾을 수 없습니다";

fn validate(input: &DealInput) -> Result<(), ApiError> {
    if input.title.trim().is_empty() {
        return Err(ApiError::Validation("거래 제목은 필수입니다".to_string()));
    }
    Ok(())
}

/// GET /deals - 거래 목록
#[utoipa::path(
    get,
    path = "/deals",
    responses((status = 200, description = "조회 성공", body = Vec<Deal>)),
    tag = "deals"
)]
pub async fn list_deals(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Deal>>> {
    Ok(Json(DealRepository::list(state.pool()?).await?))
}

/// GET /deals/{id} - 거래 조회
#[utoipa::path(
    get,
    path = "/deals/{id}",
    params(("id" = i64, Path, description = "거래 ID")),
    responses(
        (status = 200, description = "조회 성공", body = Deal),
        (status = 404, description = "거래 없음", body = ApiErrorResponse)
    ),
    tag = "deals"
)]
pub async fn get_deal(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Deal>> {
    DealRepository::find_by_id(state.pool()?, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// POST /deals - 거래 생성
#[utoipa::path(
    post,
    path = "/deals",
    request_body = DealInput,
    responses(
        (status = 201, description = "생성 성공", body = Deal),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 404, description = "고객 없음", body = ApiErrorResponse)
    ),
    tag = "deals"
)]
pub async fn create_deal(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<DealInput>,
) -> ApiResult<(StatusCode, Json<Deal>)> {
    validate(&input)?;
    let deal = DealRepository::create(state.pool()?, &input).await?;
    info!(deal_id = deal.id, customer_id = deal.customer_id, "거래 생성");
    Ok((StatusCode::CREATED, Json(deal)))
}

/// PUT /deals/{id} - 거래 수정
#[utoipa::path(
    put,
    path = "/deals/{id}",
    params(("id" = i64, Path, description = "거래 ID")),
    request_body = DealInput,
    responses(
        (status = 200, description = "수정 성공", body = Deal),
        (status = 404, description = "거래 없음", body = ApiErrorResponse)
    ),
    tag = "deals"
)]
pub async fn update_deal(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<DealInput>,
) -> ApiResult<Json<Deal>> {
    validate(&input)?;
    DealRepository::update(state.pool()?, id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// DELETE /deals/{id} - 거래 삭제
#[utoipa::path(
    delete,
    path = "/deals/{id}",
    params(("id" = i64, Path, description = "거래 ID")),
    responses(
        (status = 204, description = "삭제 성공"),
        (status = 404, description = "거래 없음", body = ApiErrorResponse)
    ),
    tag = "deals"
)]
pub async fn delete_deal(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    if !DealRepository::soft_delete(state.pool()?, id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    info!(deal_id = id, "거래 삭제");
    Ok(StatusCode::NO_CONTENT)
}

/// 거래 라우터 생성.
pub fn deals_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_deals).post(create_deal))
        .route("/{id}", get(get_deal).put(update_deal).delete(delete_deal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::{json_request, send};
    use crate::state::create_test_state;
    use axum::http::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let state = Arc::new(create_test_state());
        let app = Router::new().nest("/deals", deals_router()).with_state(state);

        let response = send(&app, json_request(Method::POST, "/deals", json!({"title": "Q3"}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            json_request(
                Method::POST,
                "/deals",
                json!({"title": "", "customer_id": 1, "status_id": 1}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
