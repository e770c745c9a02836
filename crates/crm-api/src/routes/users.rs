//! 사용자 관리 API 라우트 (Bearer 토큰 필요)
//!
//! # 엔드포인트
//!
//! - `GET /users` - 사용자 목록
//! - `GET /users/{id}` - 사용자 조회
//! - `POST /users` - 사용자 생성 (가입과 같은 절차)
//! - `PUT /users/{id}` - 사용자 수정
//! - `DELETE /users/{id}` - 사용자 삭제 (관리자 전용, 소프트 삭제)

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, middleware, routing::get, Json, Router};
use crm_core::{AccountUpdate, AccountView, Role};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{require_admin, require_auth, RegisterRequest, RequestContext};
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// 사용자 수정 요청. 빠진 필드는 유지됩니다.
#[derive(Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "이메일은 비워 둘 수 없습니다"))]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// 새 비밀번호 (해싱 후 저장)
    #[serde(default)]
    #[validate(length(min = 1, message = "비밀번호는 비워 둘 수 없습니다"))]
    pub password: Option<String>,
}

impl std::fmt::Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// GET /users - 사용자 목록
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "조회 성공", body = Vec<AccountView>),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<AccountView>>> {
    let accounts = state.users.list().await?;
    Ok(Json(accounts.into_iter().map(AccountView::from).collect()))
}

/// GET /users/{id} - 사용자 조회
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "조회 성공", body = AccountView),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<AccountView>> {
    let account = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("사용자를 찾을 수 없습니다"))?;

    Ok(Json(AccountView::from(account)))
}

/// POST /users - 사용자 생성
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "생성 성공", body = AccountView),
        (status = 400, description = "입력 오류 또는 이메일 중복", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AccountView>)> {
    let account = state.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// PUT /users/{id} - 사용자 수정
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "사용자 ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "수정 성공", body = AccountView),
        (status = 400, description = "입력 오류 또는 이메일 중복", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<AccountView>> {
    request.validate()?;

    let password_hash = match request.password {
        Some(password) => Some(state.auth.hash_password(password).await?),
        None => None,
    };

    let update = AccountUpdate {
        name: request.name,
        email: request.email,
        // 빈 역할은 가입과 같이 `user`
        role: request.role.map(|role| Role::from_input(Some(role))),
        password_hash,
    };

    let account = state
        .users
        .update(id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("사용자를 찾을 수 없습니다"))?;

    Ok(Json(AccountView::from(account)))
}

/// DELETE /users/{id} - 사용자 삭제 (관리자 전용)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 204, description = "삭제 성공"),
        (status = 403, description = "관리자 권한 필요", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    require_admin(&ctx)?;

    if !state.users.soft_delete(id).await? {
        return Err(ApiError::not_found("사용자를 찾을 수 없습니다"));
    }

    info!(user_id = id, "사용자 삭제");
    Ok(StatusCode::NO_CONTENT)
}

/// 사용자 라우터 생성. 모든 경로가 토큰 검증을 거칩니다.
pub fn users_router(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::{
        authed_json, body_json, register_and_login, send, with_token,
    };
    use crate::state::create_test_state;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::json;

    fn app() -> Router {
        let state = Arc::new(create_test_state());
        Router::new()
            .nest("/auth", crate::routes::auth_router(&state))
            .nest("/users", users_router(&state))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_users_require_token() {
        let app = app();
        let response = send(
            &app,
            Request::builder().uri("/users").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_delete() {
        let app = app();
        let (token, id) = register_and_login(&app, "plain@x.com", None).await;

        let response = send(&app, with_token(Method::DELETE, &format!("/users/{id}"), &token)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // 삭제되지 않았는지 확인
        let response = send(&app, with_token(Method::GET, &format!("/users/{id}"), &token)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_soft_deletes_user() {
        let app = app();
        let (admin_token, _) = register_and_login(&app, "boss@x.com", Some("admin")).await;
        let (user_token, user_id) = register_and_login(&app, "staff@x.com", None).await;

        let response = send(
            &app,
            with_token(Method::DELETE, &format!("/users/{user_id}"), &admin_token),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(
            &app,
            with_token(Method::DELETE, &format!("/users/{user_id}"), &admin_token),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // 삭제된 계정의 토큰은 서명상 유효하지만 계정 조회는 실패
        let response = send(&app, with_token(Method::GET, "/auth/me", &user_token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, with_token(Method::GET, "/users", &admin_token)).await;
        let list = body_json(response).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_hashes_password() {
        let app = app();
        let (token, id) = register_and_login(&app, "a@x.com", None).await;

        let response = send(
            &app,
            authed_json(
                Method::PUT,
                &format!("/users/{id}"),
                &token,
                json!({"name": "Renamed", "password": "newpw"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Renamed");
        assert!(body.get("password").is_none());

        let login = send(
            &app,
            crate::routes::testing::json_request(
                Method::POST,
                "/auth/login",
                json!({"email": "a@x.com", "password": "newpw"}),
            ),
        )
        .await;
        assert_eq!(login.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let app = app();
        let (token, _) = register_and_login(&app, "a@x.com", None).await;

        let response = send(
            &app,
            authed_json(
                Method::POST,
                "/users",
                &token,
                json!({"email": "a@x.com", "password": "pw"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            authed_json(
                Method::POST,
                "/users",
                &token,
                json!({"email": "b@x.com", "password": "pw", "name": "Bae"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["name"], "Bae");
    }

    #[tokio::test]
    async fn test_update_blank_role_falls_back_to_user() {
        let app = app();
        let (token, id) = register_and_login(&app, "r@x.com", Some("manager")).await;

        let response = send(
            &app,
            authed_json(Method::PUT, &format!("/users/{id}"), &token, json!({"role": ""})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["role"], "user");

        let response = send(
            &app,
            authed_json(Method::PUT, &format!("/users/{id}"), &token, json!({"role": "admin"})),
        )
        .await;
        assert_eq!(body_json(response).await["role"], "admin");
    }
}
