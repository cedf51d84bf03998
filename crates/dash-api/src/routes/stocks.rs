//! 종목 스냅샷 endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use dash_core::StockSnapshot;
use dash_data::FetchError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// 단일 종목 조회 응답.
///
/// 수집 실패도 200으로 `{symbol, error}` 형태로 반환합니다.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StockLookupResponse {
    /// 스냅샷
    Snapshot(StockSnapshot),
    /// 수집 실패
    Failed { symbol: String, error: String },
}

impl From<Result<StockSnapshot, FetchError>> for StockLookupResponse {
    fn from(result: Result<StockSnapshot, FetchError>) -> Self {
        match result {
            Ok(snapshot) => StockLookupResponse::Snapshot(snapshot),
            Err(e) => StockLookupResponse::Failed {
                symbol: e.symbol().to_string(),
                error: e.to_string(),
            },
        }
    }
}

/// 전체 종목 스냅샷.
///
/// 캐시가 만료되었으면 전체 갱신 후 응답합니다 (심볼 오름차순).
///
/// GET /api/stocks
#[utoipa::path(
    get,
    path = "/api/stocks",
    tag = "stocks",
    responses(
        (status = 200, description = "전체 종목 스냅샷", body = [StockSnapshot])
    )
)]
pub async fn list_stocks(State(state): State<Arc<AppState>>) -> Json<Vec<StockSnapshot>> {
    Json(state.cache.get_all().await)
}

/// 단일 종목 스냅샷.
///
/// GET /api/stocks/{symbol}
#[utoipa::path(
    get,
    path = "/api/stocks/{symbol}",
    tag = "stocks",
    params(("symbol" = String, Path, description = "종목 심볼 (예: RELIANCE)")),
    responses(
        (status = 200, description = "스냅샷 또는 {symbol, error}", body = StockLookupResponse)
    )
)]
pub async fn get_stock(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Json<StockLookupResponse> {
    Json(state.cache.get_one(&symbol).await.into())
}

/// 종목 라우터 생성.
pub fn stocks_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stocks", get(list_stocks))
        .route("/api/stocks/{symbol}", get(get_stock))
}
