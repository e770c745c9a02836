//! CRM API 서버.
//!
//! 설정을 읽고 PostgreSQL에 연결한 뒤 마이그레이션을 적용하고
//! Axum 기반 REST API 서버를 시작합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crm_api::auth::PasswordHasher;
use crm_api::openapi::swagger_ui_router;
use crm_api::repository::PgUserStore;
use crm_api::routes::create_api_router;
use crm_api::state::AppState;
use crm_core::{init_logging, AppConfig, DatabaseConfig, LogConfig};

/// 쉼표로 구분된 origin 목록 파싱. 헤더 값으로 쓸 수 없는 항목은 버립니다.
fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect()
}

/// CORS 레이어 생성.
///
/// `CORS_ORIGINS`(예: `https://crm.example.com,https://admin.example.com`)에
/// 유효한 origin이 하나라도 있으면 그 목록만 허용하고 credentials를 켭니다.
/// 없으면 모든 origin을 허용합니다 (로컬 개발용).
fn cors_layer() -> CorsLayer {
    let origins = std::env::var("CORS_ORIGINS")
        .map(|raw| parse_origins(&raw))
        .unwrap_or_default();

    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        warn!("허용 origin 목록이 비어 있어 모든 origin을 허용합니다");
        return base.allow_origin(AllowOrigin::any());
    }

    info!(count = origins.len(), "CORS origin 제한 적용");
    // 와일드카드 origin과 credentials는 함께 쓸 수 없음
    base.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(create_api_router(&state).with_state(state))
        // OpenAPI 문서 및 Swagger UI
        .merge(swagger_ui_router())
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer())
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 `true`를 반환합니다.
fn handle_export_openapi() -> Result<bool, Box<dyn std::error::Error>> {
    use crm_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
        println!("{}", json);
        return Ok(true);
    }

    Ok(false)
}

/// 데이터베이스 연결 및 마이그레이션.
async fn connect_database(config: &DatabaseConfig) -> Result<PgPool, Box<dyn std::error::Error>> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| {
            error!(error = %e, "데이터베이스 연결 실패. DATABASE_URL을 확인하세요.");
            e
        })?;
    info!(max_connections = config.max_connections, "Database connected");

    sqlx::migrate!("../../migrations").run(&pool).await?;
    info!("Database migrations applied");

    Ok(pool)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // OpenAPI 내보내기 처리 (서버 시작 전)
    if handle_export_openapi()? {
        return Ok(());
    }

    // 설정 로드 (JWT_SECRET이 없으면 여기서 종료)
    let config = AppConfig::load().map_err(|e| {
        eprintln!("설정 로드 실패: {e}");
        e
    })?;

    init_logging(&LogConfig::from(&config.logging))?;
    info!("Starting CRM API server...");

    let addr = config.server.socket_addr().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. API_HOST, API_PORT 환경변수를 확인하세요."
        );
        e
    })?;

    let pool = connect_database(&config.database).await?;

    let state = Arc::new(
        AppState::new(
            &config.auth,
            PasswordHasher::default(),
            Arc::new(PgUserStore::new(pool.clone())),
        )
        .with_db_pool(pool.clone()),
    );
    info!(version = %state.version, "애플리케이션 상태 준비 완료");

    let app = create_router(state);

    info!(%addr, docs = %format!("http://{addr}/swagger-ui"), "CRM API 서버 대기 중");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let shutdown_token = CancellationToken::new();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    info!("Server shutdown initiated, closing database pool...");
    if tokio::time::timeout(Duration::from_secs(10), pool.close())
        .await
        .is_err()
    {
        warn!("Database pool close timed out");
    }

    info!("서버 종료 완료");
    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
        _ = shutdown_token.cancelled() => {}
    }

    shutdown_token.cancel();
    info!("Shutdown signal received");
}
