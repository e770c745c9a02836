//! 태그 API 라우트
//!
//! # 엔드포인트
//!
//! - `GET /tags`, `POST /tags`
//! - `GET /tags/{id}`, `PUT /tags/{id}`, `DELETE /tags/{id}`

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use crm_core::{Tag, TagInput};

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::repository::TagRepository;
use crate::state::AppState;

const NOT_FOUND: &str = "태그를 찾을 수 없습니다";

fn validate(input: &TagInput) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("태그 이름은 필수입니다".to_string()));
    }
    Ok(())
}

/// GET /tags - 태그 목록
#[utoipa::path(
    get,
    path = "/tags",
    responses((status = 200, description = "조회 성공", body = Vec<Tag>)),
    tag = "tags"
)]
pub async fn list_tags(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(TagRepository::list(state.pool()?).await?))
}

/// GET /tags/{id} - 태그 조회
#[utoipa::path(
    get,
    path = "/tags/{id}",
    params(("id" = i64, Path, description = "태그 ID")),
    responses(
        (status = 200, description = "조회 성공", body = Tag),
        (status = 404, description = "태그 없음", body = ApiErrorResponse)
    ),
    tag = "tags"
)]
pub async fn get_tag(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Tag>> {
    TagRepository::find_by_id(state.pool()?, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// POST /tags - 태그 생성
#[utoipa::path(
    post,
    path = "/tags",
    request_body = TagInput,
    responses(
        (status = 201, description = "생성 성공", body = Tag),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse)
    ),
    tag = "tags"
)]
pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<TagInput>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    validate(&input)?;
    let tag = TagRepository::create(state.pool()?, &input).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// PUT /tags/{id} - 태그 수정
#[utoipa::path(
    put,
    path = "/tags/{id}",
    params(("id" = i64, Path, description = "태그 ID")),
    request_body = TagInput,
    responses(
        (status = 200, description = "수정 성공", body = Tag),
        (status = 404, description = "태그 없음", body = ApiErrorResponse)
    ),
    tag = "tags"
)]
pub async fn update_tag(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<TagInput>,
) -> ApiResult<Json<Tag>> {
    validate(&input)?;
    TagRepository::update(state.pool()?, id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// DELETE /tags/{id} - 태그 삭제
#[utoipa::path(
    delete,
    path = "/tags/{id}",
    params(("id" = i64, Path, description = "태그 ID")),
    responses(
        (status = 204, description = "삭제 성공"),
        (status = 404, description = "태그 없음", body = ApiErrorResponse)
    ),
    tag = "tags"
)]
pub async fn delete_tag(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    if !TagRepository::soft_delete(state.pool()?, id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// 태그 라우터 생성.
pub fn tags_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/{id}", get(get_tag).put(update_tag).delete(delete_tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::{json_request, send};
    use crate::state::create_test_state;
    use axum::http::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_blank_name_rejected_before_database() {
        let state = Arc::new(create_test_state());
        let app = Router::new().nest("/tags", tags_router()).with_state(state);

        let response = send(&app, json_request(Method::POST, "/tags", json!({"name": "  "}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
