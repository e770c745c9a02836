//! 댓글 API 라우트 (Bearer 토큰 필요)
//!
//! # 엔드포인트
//!
//! - `GET /comments`, `POST /comments`
//! - `GET /comments/{id}`, `PUT /comments/{id}`, `DELETE /comments/{id}`
//!
//! 작성자는 요청 본문이 아니라 검증된 토큰의 사용자로 정해집니다.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, middleware, routing::get, Json, Router};
use crm_core::{Comment, CommentInput};
use tracing::info;

use crate::auth::{require_auth, RequestContext};
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::repository::CommentRepository;
use crate::state::AppState;

const NOT_FOUND: &str = "댓글을 찾을 수 없습니다";

fn validate(input: &CommentInput) -> Result<(), ApiError> {
    if input.content.trim().is_empty() {
        return Err(ApiError::Validation("댓글 내용은 필수입니다".to_string()));
    }
    Ok(())
}

/// GET /comments - 댓글 목록
#[utoipa::path(
    get,
    path = "/comments",
    responses(
        (status = 200, description = "조회 성공", body = Vec<Comment>),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn list_comments(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(CommentRepository::list(state.pool()?).await?))
}

/// GET /comments/{id} - 댓글 조회
#[utoipa::path(
    get,
    path = "/comments/{id}",
    params(("id" = i64, Path, description = "댓글 ID")),
    responses(
        (status = 200, description = "조회 성공", body = Comment),
        (status = 404, description = "댓글 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn get_comment(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Comment>> {
    CommentRepository::find_by_id(state.pool()?, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// POST /comments - 댓글 작성
#[utoipa::path(
    post,
    path = "/comments",
    request_body = CommentInput,
    responses(
        (status = 201, description = "작성 성공", body = Comment),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 404, description = "거래 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ApiJson(input): ApiJson<CommentInput>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let author = ctx.require_identity()?;
    validate(&input)?;

    let comment = CommentRepository::create(state.pool()?, author.id, &input).await?;
    info!(comment_id = comment.id, deal_id = comment.deal_id, user_id = author.id, "댓글 작성");
    Ok((StatusCode::CREATED, Json(comment)))
}

/// PUT /comments/{id} - 댓글 수정
#[utoipa::path(
    put,
    path = "/comments/{id}",
    params(("id" = i64, Path, description = "댓글 ID")),
    request_body = CommentInput,
    responses(
        (status = 200, description = "수정 성공", body = Comment),
        (status = 404, description = "댓글 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<CommentInput>,
) -> ApiResult<Json<Comment>> {
    validate(&input)?;
    CommentRepository::update(state.pool()?, id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// DELETE /comments/{id} - 댓글 삭제
#[utoipa::path(
    delete,
    path = "/comments/{id}",
    params(("id" = i64, Path, description = "댓글 ID")),
    responses(
        (status = 204, description = "삭제 성공"),
        (status = 404, description = "댓글 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    if !CommentRepository::soft_delete(state.pool()?, id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// 댓글 라우터 생성. 모든 경로가 토큰 검증을 거칩니다.
pub fn comments_router(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_comments).post(create_comment))
        .route(
            "/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::{authed_json, json_request, register_and_login, send};
    use crate::state::create_test_state;
    use axum::http::Method;
    use serde_json::json;

    fn app() -> Router {
        let state = Arc::new(create_test_state());
        Router::new()
            .nest("/auth", crate::routes::auth_router(&state))
            .nest("/comments", comments_router(&state))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_comments_require_token() {
        let app = app();
        let response = send(
            &app,
            json_request(Method::POST, "/comments", json!({"deal_id": 1, "content": "hi"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_blank_content_rejected() {
        let app = app();
        let (token, _) = register_and_login(&app, "a@x.com", None).await;

        let response = send(
            &app,
            authed_json(
                Method::POST,
                "/comments",
                &token,
                json!({"deal_id": 1, "content": ""}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
