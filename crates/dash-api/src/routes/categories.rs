//! 카테고리 endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use dash_core::{CategoryMap, CategoryTables, CategoryType, CategoryTypeInfo, StockSnapshot};

use crate::error::{data_error_response, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 카테고리 종류 목록.
///
/// GET /api/category-types
#[utoipa::path(
    get,
    path = "/api/category-types",
    tag = "categories",
    responses((status = 200, description = "카테고리 종류", body = [CategoryTypeInfo]))
)]
pub async fn list_category_types() -> Json<Vec<CategoryTypeInfo>> {
    Json(CategoryTables::category_types())
}

/// 시가총액 카테고리 테이블.
///
/// GET /api/categories/market-cap
#[utoipa::path(
    get,
    path = "/api/categories/market-cap",
    tag = "categories",
    responses((status = 200, description = "카테고리 → 심볼 목록", body = BTreeMap<String, Vec<String>>))
)]
pub async fn market_cap_categories(State(state): State<Arc<AppState>>) -> Json<CategoryMap> {
    Json(state.categories.table(CategoryType::MarketCap).clone())
}

/// 기업집단 카테고리 테이블.
///
/// GET /api/categories/business
#[utoipa::path(
    get,
    path = "/api/categories/business",
    tag = "categories",
    responses((status = 200, description = "카테고리 → 심볼 목록", body = BTreeMap<String, Vec<String>>))
)]
pub async fn business_categories(State(state): State<Arc<AppState>>) -> Json<CategoryMap> {
    Json(state.categories.table(CategoryType::Business).clone())
}

/// 카테고리 소속 종목 스냅샷.
///
/// GET /api/categories/{category_type}/{category}
#[utoipa::path(
    get,
    path = "/api/categories/{category_type}/{category}",
    tag = "categories",
    params(
        ("category_type" = String, Path, description = "market-cap 또는 business"),
        ("category" = String, Path, description = "카테고리 이름 (예: large-cap)")
    ),
    responses(
        (status = 200, description = "카테고리 종목 스냅샷", body = [StockSnapshot]),
        (status = 404, description = "알 수 없는 카테고리", body = ApiErrorResponse),
        (status = 500, description = "내부 오류", body = ApiErrorResponse)
    )
)]
pub async fn category_stocks(
    State(state): State<Arc<AppState>>,
    Path((category_type, category)): Path<(String, String)>,
) -> ApiResult<Json<Vec<StockSnapshot>>> {
    state
        .cache
        .get_by_category(&category_type, &category)
        .await
        .map(Json)
        .map_err(data_error_response)
}

/// 카테고리 라우터 생성.
pub fn categories_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/category-types", get(list_category_types))
        .route("/api/categories/market-cap", get(market_cap_categories))
        .route("/api/categories/business", get(business_categories))
        .route(
            "/api/categories/{category_type}/{category}",
            get(category_stocks),
        )
}
