//! 거래 상태 API 라우트
//!
//! # 엔드포인트
//!
//! - `GET /statuses`, `POST /statuses`
//! - `GET /statuses/{id}`, `PUT /statuses/{id}`
//! - `DELETE /statuses/{id}` - Bearer 토큰과 관리자 권한 필요 (물리 삭제)

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{delete, get},
    Json, Router,
};
use crm_core::{Status, StatusInput};
use tracing::info;

use crate::auth::{require_admin, require_auth, RequestContext};
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::repository::StatusRepository;
use crate::state::AppState;

const NOT_FOUND: &str = "상태를 찾을 수 없습니다";

fn validate(input: &StatusInput) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("상태 이름은 필수입니다".to_string()));
    }
    Ok(())
}

/// GET /statuses - 상태 목록
#[utoipa::path(
    get,
    path = "/statuses",
    responses((status = 200, description = "조회 성공", body = Vec<Status>)),
    tag = "statuses"
)]
pub async fn list_statuses(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Status>>> {
    Ok(Json(StatusRepository::list(state.pool()?).await?))
}

/// GET /statuses/{id} - 상태 조회
#[utoipa::path(
    get,
    path = "/statuses/{id}",
    params(("id" = i64, Path, description = "상태 ID")),
    responses(
        (status = 200, description = "조회 성공", body = Status),
        (status = 404, description = "상태 없음", body = ApiErrorResponse)
    ),
    tag = "statuses"
)]
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Status>> {
    StatusRepository::find_by_id(state.pool()?, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// POST /statuses - 상태 생성
#[utoipa::path(
    post,
    path = "/statuses",
    request_body = StatusInput,
    responses(
        (status = 201, description = "생성 성공", body = Status),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse)
    ),
    tag = "statuses"
)]
pub async fn create_status(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<StatusInput>,
) -> ApiResult<(StatusCode, Json<Status>)> {
    validate(&input)?;
    let status = StatusRepository::create(state.pool()?, &input).await?;
    Ok((StatusCode::CREATED, Json(status)))
}

/// PUT /statuses/{id} - 상태 수정
#[utoipa::path(
    put,
    path = "/statuses/{id}",
    params(("id" = i64, Path, description = "상태 ID")),
    request_body = StatusInput,
    responses(
        (status = 200, description = "수정 성공", body = Status),
        (status = 404, description = "상태 없음", body = ApiErrorResponse)
    ),
    tag = "statuses"
)]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<StatusInput>,
) -> ApiResult<Json<Status>> {
    validate(&input)?;
    StatusRepository::update(state.pool()?, id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// DELETE /statuses/{id} - 상태 삭제 (관리자 전용)
#[utoipa::path(
    delete,
    path = "/statuses/{id}",
    params(("id" = i64, Path, description = "상태 ID")),
    responses(
        (status = 204, description = "삭제 성공"),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "관리자 권한 필요", body = ApiErrorResponse),
        (status = 404, description = "상태 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "statuses"
)]
pub async fn delete_status(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    require_admin(&ctx)?;

    if !StatusRepository::delete(state.pool()?, id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    info!(status_id = id, "상태 삭제");
    Ok(StatusCode::NO_CONTENT)
}

/// 상태 라우터 생성. 삭제만 토큰 검증을 거칩니다.
pub fn statuses_router(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/{id}", delete(delete_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(list_statuses).post(create_status))
        .route("/{id}", get(get_status).put(update_status))
        .merge(protected)
}
