//! 52주 대시보드 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (종목 스냅샷, 카테고리, 캐시 관리)
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//! - 프론트엔드 정적 파일 제공
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::{ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::create_api_router;
pub use state::AppState;
