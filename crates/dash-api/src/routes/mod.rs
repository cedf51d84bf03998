//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness, 캐시 상태 포함)
//! - `/api/stocks` - 전체 종목 스냅샷
//! - `/api/stocks/{symbol}` - 단일 종목 스냅샷
//! - `/api/category-types` - 카테고리 종류
//! - `/api/categories/market-cap`, `/api/categories/business` - 카테고리 테이블
//! - `/api/categories/{type}/{category}` - 카테고리별 스냅샷
//! - `/api/cache/status`, `/api/cache/refresh` - 캐시 관리

pub mod cache;
pub mod categories;
pub mod frontend;
pub mod health;
pub mod stocks;

pub use cache::cache_router;
pub use categories::categories_router;
pub use frontend::frontend_router;
pub use health::{health_router, HealthResponse};
pub use stocks::{stocks_router, StockLookupResponse};

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health_router())
        .merge(stocks_router())
        .merge(categories_router())
        .merge(cache_router())
}
