//! 인증 API 라우트
//!
//! # 엔드포인트
//!
//! - `POST /auth/register` - 계정 등록
//! - `POST /auth/login` - 로그인 (토큰 발급)
//! - `GET /auth/me` - 내 정보 (Bearer 토큰 필요)

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use crm_core::AccountView;
use tracing::debug;

use crate::auth::{require_auth, LoginRequest, LoginResponse, RegisterRequest, RequestContext};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

/// POST /auth/register - 계정 등록
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "등록 성공", body = AccountView),
        (status = 400, description = "입력 오류 또는 이메일 중복", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AccountView>)> {
    debug!(email = %request.email, "계정 등록 요청");

    let account = state.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// POST /auth/login - 로그인
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 401, description = "이메일 또는 비밀번호 불일치", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(response))
}

/// GET /auth/me - 내 정보
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "조회 성공", body = AccountView),
        (status = 401, description = "토큰 없음 또는 무효", body = ApiErrorResponse),
        (status = 404, description = "계정 삭제됨", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> ApiResult<Json<AccountView>> {
    let identity = ctx.require_identity()?;
    let account = state.auth.me(identity).await?;
    Ok(Json(account))
}

/// 인증 라우터 생성. `/me`만 토큰 검증을 거칩니다.
pub fn auth_router(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::{body_json, json_request, send, with_token};
    use crate::state::create_test_state;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn app() -> Router {
        let state = Arc::new(create_test_state());
        Router::new()
            .nest("/auth", auth_router(&state))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_register_login_me_flow() {
        let app = app();

        let response = send(
            &app,
            json_request(
                Method::POST,
                "/auth/register",
                json!({"email": "a@x.com", "password": "pw1"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["email"], "a@x.com");
        assert_eq!(created["role"], "user");
        assert!(created.get("password").is_none());
        assert!(created.get("password_hash").is_none());

        let response = send(
            &app,
            json_request(
                Method::POST,
                "/auth/login",
                json!({"email": "a@x.com", "password": "pw1"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let token = body_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        let response = send(&app, with_token(Method::GET, "/auth/me", &format!("Bearer {token}"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let me = body_json(response).await;
        assert_eq!(me["id"], created["id"]);
        assert_eq!(me["email"], "a@x.com");
        assert_eq!(me["role"], "user");
        assert!(me.get("password").is_none());
        assert!(me.get("password_hash").is_none());

        // 접두사 없는 토큰도 허용
        let response = send(&app, with_token(Method::GET, "/auth/me", &token)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_validation_and_conflict() {
        let app = app();

        let response = send(
            &app,
            json_request(Method::POST, "/auth/register", json!({"email": "a@x.com"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json!({"email": "a@x.com", "password": "pw1"});
        let first = send(&app, json_request(Method::POST, "/auth/register", body.clone())).await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = send(&app, json_request(Method::POST, "/auth/register", body)).await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(second).await["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_login_does_not_reveal_which_part_failed() {
        let app = app();
        send(
            &app,
            json_request(
                Method::POST,
                "/auth/register",
                json!({"email": "a@x.com", "password": "pw1"}),
            ),
        )
        .await;

        let unknown = send(
            &app,
            json_request(
                Method::POST,
                "/auth/login",
                json!({"email": "b@x.com", "password": "pw1"}),
            ),
        )
        .await;
        let wrong = send(
            &app,
            json_request(
                Method::POST,
                "/auth/login",
                json!({"email": "a@x.com", "password": "nope"}),
            ),
        )
        .await;

        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(unknown).await, body_json(wrong).await);
    }

    #[tokio::test]
    async fn test_me_rejects_missing_and_bad_tokens() {
        let app = app();

        let response = send(
            &app,
            axum::http::Request::builder()
                .uri("/auth/me")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        for blank in ["", "   "] {
            let response = send(&app, with_token(Method::GET, "/auth/me", blank)).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(body_json(response).await["code"], "MISSING_TOKEN");
        }

        let response = send(&app, with_token(Method::GET, "/auth/me", "Bearer not.a.jwt")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "INVALID_TOKEN");
    }
}
