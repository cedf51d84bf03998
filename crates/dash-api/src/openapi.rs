//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use dash_core::{CategoryTypeInfo, StockSnapshot};
use dash_data::{CacheStatus, FailedSymbol, RefreshReport};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::routes::{cache, categories, health, stocks, HealthResponse, StockLookupResponse};

/// 52-Week Dash API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "52-Week Dash API",
        version = "0.1.0",
        description = r#"
# 52-Week Dash REST API

NSE 종목의 현재가와 52주 최고가/최저가 대비 괴리율을 제공합니다.
스냅샷은 TTL 캐시에 보관되며, 만료 시 배치 단위로 전체 갱신됩니다.
"#
    ),
    paths(
        health::health_check,
        health::health_ready,
        stocks::list_stocks,
        stocks::get_stock,
        categories::list_category_types,
        categories::market_cap_categories,
        categories::business_categories,
        categories::category_stocks,
        cache::cache_status,
        cache::refresh_cache
    ),
    components(schemas(
        StockSnapshot,
        StockLookupResponse,
        CategoryTypeInfo,
        CacheStatus,
        RefreshReport,
        FailedSymbol,
        HealthResponse,
        ApiErrorResponse
    )),
    tags(
        (name = "health", description = "헬스 체크"),
        (name = "stocks", description = "종목 스냅샷"),
        (name = "categories", description = "시가총액/기업집단 카테고리"),
        (name = "cache", description = "캐시 관리")
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
