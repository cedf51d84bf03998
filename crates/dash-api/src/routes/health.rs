//! 헬스 체크 endpoint.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use dash_data::CacheStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// 전체 서비스 상태 ("healthy" | "degraded")
    pub status: String,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 현재 시간 (ISO 8601)
    pub timestamp: String,

    /// 캐시 상태
    pub cache: CacheStatus,
}

/// 간단한 헬스 체크 (liveness 확인용).
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "서버 동작 중"))
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 상세 헬스 체크 (readiness 확인용).
///
/// 캐시가 만료되었거나 한 번도 갱신되지 않았으면 "degraded"입니다.
/// 요청 시 갱신되므로 상태 코드는 항상 200입니다.
///
/// GET /health/ready
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses((status = 200, description = "상세 상태", body = HealthResponse))
)]
pub async fn health_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cache = state.cache.status().await;
    let status = if cache.fresh { "healthy" } else { "degraded" };

    let response = HealthResponse {
        status: status.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        cache,
    };

    (StatusCode::OK, Json(response))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(health_ready))
}
