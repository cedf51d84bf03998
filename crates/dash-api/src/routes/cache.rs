//! 캐시 관리 endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use dash_data::{CacheStatus, RefreshReport};
use tracing::info;

use crate::state::AppState;

/// 캐시 상태.
///
/// GET /api/cache/status
#[utoipa::path(
    get,
    path = "/api/cache/status",
    tag = "cache",
    responses((status = 200, description = "캐시 상태", body = CacheStatus))
)]
pub async fn cache_status(State(state): State<Arc<AppState>>) -> Json<CacheStatus> {
    Json(state.cache.status().await)
}

/// 강제 전체 갱신.
///
/// 캐시 유효 여부와 관계없이 전체 갱신을 수행하고 결과를 반환합니다.
///
/// POST /api/cache/refresh
#[utoipa::path(
    post,
    path = "/api/cache/refresh",
    tag = "cache",
    responses((status = 200, description = "갱신 결과", body = RefreshReport))
)]
pub async fn refresh_cache(State(state): State<Arc<AppState>>) -> Json<RefreshReport> {
    info!("수동 캐시 갱신 요청");
    Json(state.cache.refresh().await)
}

/// 캐시 라우터 생성.
pub fn cache_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/cache/status", get(cache_status))
        .route("/api/cache/refresh", post(refresh_cache))
}
