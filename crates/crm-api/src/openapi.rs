//! OpenAPI 문서화 설정.
//!
//! utoipa로 REST API의 OpenAPI 3 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use crm_core::{
    AccountView, Comment, CommentInput, Customer, CustomerInput, Deal, DealInput, Role, Status,
    StatusInput, Tag, TagInput,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::error::ApiErrorResponse;
use crate::routes::{HealthResponse, UpdateUserRequest};

/// Bearer 토큰 보안 스키마 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// CRM API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CRM Backend API",
        description = r#"
# CRM 백엔드 REST API

고객, 거래, 거래 상태, 태그, 댓글, 사용자를 관리합니다.

## 인증

`POST /auth/login`으로 받은 토큰을 `Authorization: Bearer <token>` 헤더에 넣으세요.
토큰은 발급 후 24시간 동안 유효합니다. `/users`, `/comments`, `/auth/me`,
`DELETE /statuses/{id}`는 토큰이 필요하며, 사용자 삭제와 상태 삭제는 관리자만 가능합니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크"),
        (name = "auth", description = "인증 - 가입, 로그인, 내 정보"),
        (name = "users", description = "사용자 관리"),
        (name = "customers", description = "고객"),
        (name = "deals", description = "거래"),
        (name = "statuses", description = "거래 상태"),
        (name = "tags", description = "태그"),
        (name = "comments", description = "거래 댓글")
    ),
    modifiers(&SecurityAddon),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,
            HealthResponse,

            // ===== Auth / Users =====
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            AccountView,
            Role,
            UpdateUserRequest,

            // ===== Entities =====
            Customer,
            CustomerInput,
            Deal,
            DealInput,
            Status,
            StatusInput,
            Tag,
            TagInput,
            Comment,
            CommentInput,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,

        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::create_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,

        crate::routes::customers::list_customers,
        crate::routes::customers::get_customer,
        crate::routes::customers::create_customer,
        crate::routes::customers::update_customer,
        crate::routes::customers::delete_customer,

        crate::routes::deals::list_deals,
        crate::routes::deals::get_deal,
        crate::routes::deals::create_deal,
        crate::routes::deals::update_deal,
        crate::routes::deals::delete_deal,

        crate::routes::statuses::list_statuses,
        crate::routes::statuses::get_status,
        crate::routes::statuses::create_status,
        crate::routes::statuses::update_status,
        crate::routes::statuses::delete_status,

        crate::routes::tags::list_tags,
        crate::routes::tags::get_tag,
        crate::routes::tags::create_tag,
        crate::routes::tags::update_tag,
        crate::routes::tags::delete_tag,

        crate::routes::comments::list_comments,
        crate::routes::comments::get_comment,
        crate::routes::comments::create_comment,
        crate::routes::comments::update_comment,
        crate::routes::comments::delete_comment,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("CRM Backend API"));
        assert!(json.contains("/auth/register"));
        assert!(json.contains("/auth/me"));
        assert!(json.contains("/users/{id}"));
        assert!(json.contains("/statuses/{id}"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_schemas_never_expose_hash() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("AccountView"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
