//! 프론트엔드 정적 파일.
//!
//! `/`는 `index.html`, `/static/*`은 디렉토리 내 파일을 제공합니다.

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// 정적 파일 라우터 생성.
pub fn frontend_router<S>(dir: impl AsRef<Path>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let dir = dir.as_ref();
    Router::new()
        .route_service("/", ServeFile::new(dir.join("index.html")))
        .nest_service("/static", ServeDir::new(dir))
}
