//! 고객 API 라우트
//!
//! # 엔드포인트
//!
//! - `GET /customers` - 고객 목록
//! - `GET /customers/{id}` - 고객 조회
//! - `POST /customers` - 고객 생성
//! - `PUT /customers/{id}` - 고객 수정
//! - `DELETE /customers/{id}` - 고객 삭제

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use crm_core::{Customer, CustomerInput};
use tracing::{debug, info};

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::repository::CustomerRepository;
use crate::state::AppState;

const NOT_FOUND: &str = "고객을 찾을 수 없습니다";

/// GET /customers - 고객 목록
#[utoipa::path(
    get,
    path = "/customers",
    responses(
        (status = 200, description = "조회 성공", body = Vec<Customer>),
        (status = 500, description = "서버 오류", body = ApiErrorResponse)
    ),
    tag = "customers"
)]
pub async fn list_customers(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Customer>>> {
    debug!("고객 목록 조회");
    let customers = CustomerRepository::list(state.pool()?).await?;
    Ok(Json(customers))
}

/// GET /customers/{id} - 고객 조회
#[utoipa::path(
    get,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "고객 ID")),
    responses(
        (status = 200, description = "조회 성공", body = Customer),
        (status = 404, description = "고객 없음", body = ApiErrorResponse)
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Customer>> {
    CustomerRepository::find_by_id(state.pool()?, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// POST /customers - 고객 생성
#[utoipa::path(
    post,
    path = "/customers",
    request_body = CustomerInput,
    responses(
        (status = 201, description = "생성 성공", body = Customer),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse)
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let customer = CustomerRepository::create(state.pool()?, &input).await?;
    info!(customer_id = customer.id, "고객 생성");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// PUT /customers/{id} - 고객 수정
#[utoipa::path(
    put,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "고객 ID")),
    request_body = CustomerInput,
    responses(
        (status = 200, description = "수정 성공", body = Customer),
        (status = 404, description = "고객 없음", body = ApiErrorResponse)
    ),
    tag = "customers"
)]
pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> ApiResult<Json<Customer>> {
    CustomerRepository::update(state.pool()?, id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// DELETE /customers/{id} - 고객 삭제
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "고객 ID")),
    responses(
        (status = 204, description = "삭제 성공"),
        (status = 404, description = "고객 없음", body = ApiErrorResponse)
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    if !CustomerRepository::soft_delete(state.pool()?, id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    info!(customer_id = id, "고객 삭제");
    Ok(StatusCode::NO_CONTENT)
}

/// 고객 라우터 생성.
pub fn customers_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}
