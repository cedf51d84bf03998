//! 52주 대시보드 API 서버.
//!
//! 설정을 로드하고 Yahoo Finance Provider, 스냅샷 캐시를 구성한 뒤
//! Axum 서버를 시작합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use dash_api::metrics::setup_metrics_recorder;
use dash_api::middleware::metrics_layer;
use dash_api::openapi::swagger_ui_router;
use dash_api::routes::{create_api_router, frontend_router};
use dash_api::state::AppState;
use dash_core::{init_logging, AppConfig, LogConfig};
use dash_data::YahooMarketDataProvider;

/// CORS 레이어 생성.
///
/// `CORS_ORIGINS`(쉼표 구분)가 설정되면 해당 origin만 허용합니다.
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600))
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 구성.
fn create_router(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    request_timeout: Duration,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    let frontend = frontend_router(&state.frontend_dir);
    let api_router = create_api_router().with_state(state);

    Router::new()
        .merge(metrics_router)
        .merge(api_router)
        .merge(frontend)
        .merge(swagger_ui_router())
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 콜드 캐시에서 전체 갱신이 끝날 때까지 기다릴 수 있도록 설정값 사용
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(cors_layer())
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 종료합니다.
fn handle_export_openapi() -> anyhow::Result<()> {
    use dash_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
        println!("{}", json);
        std::process::exit(0);
    }

    Ok(())
}

/// 시작 직후 백그라운드 전체 갱신.
fn spawn_cache_warmup(state: Arc<AppState>, shutdown_token: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_token.cancelled() => {
                info!("Cache warm-up cancelled by shutdown");
            }
            report = state.cache.refresh() => {
                info!(
                    succeeded = report.succeeded,
                    failed = report.failed.len(),
                    elapsed_ms = report.elapsed_ms,
                    "Cache warm-up completed"
                );
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    handle_export_openapi()?;

    let config = AppConfig::load_default().context("설정 파일을 로드할 수 없습니다")?;

    init_logging(LogConfig::from_settings(&config.logging))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    info!("Starting 52-Week Dash API server...");

    config.validate()?;

    let metrics_handle = setup_metrics_recorder()?;
    info!("Prometheus metrics recorder initialized");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            error!(
                host = %config.server.host,
                port = config.server.port,
                error = %e,
                "소켓 주소 설정이 유효하지 않습니다. server.host, server.port를 확인하세요."
            );
            e
        })?;

    let provider = Arc::new(YahooMarketDataProvider::new(
        config.fetch.exchange_suffix.clone(),
    )?);
    let state = Arc::new(AppState::from_config(&config, provider));

    info!(
        version = %state.version,
        symbols = state.cache.universe().len(),
        market_cap_categories = state.categories.market_cap.len(),
        business_categories = state.categories.business.len(),
        expiry_secs = config.cache.expiry_secs,
        batch_size = config.fetch.batch_size,
        "Application state initialized"
    );

    let shutdown_token = CancellationToken::new();

    if config.cache.warm_on_start {
        spawn_cache_warmup(state.clone(), shutdown_token.clone());
    }

    let app = create_router(
        state,
        metrics_handle,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    info!(%addr, "API server listening");
    info!("Dashboard available at http://{}/", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    shutdown_token.cancel();
    info!("Server stopped gracefully");

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
    }

    shutdown_token.cancel();
}
