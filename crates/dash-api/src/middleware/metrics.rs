//! HTTP 요청 metrics middleware.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::metrics::{record_http_duration, record_http_request, record_http_response};

/// 라우트에 매칭되지 않은 요청의 path 라벨.
pub const UNMATCHED_PATH: &str = "unmatched";

/// HTTP 메트릭을 수집하는 미들웨어 레이어.
///
/// path 라벨에는 실제 URI 대신 매칭된 라우트 패턴(예: `/api/stocks/{symbol}`)을
/// 사용하여 라벨 카디널리티를 제한합니다.
///
/// 각 요청에 대해 다음 메트릭을 기록합니다:
/// - `http_requests_total`: 총 요청 수 (method, path 라벨)
/// - `http_responses_total`: 총 응답 수 (method, path, status 라벨)
/// - `http_request_duration_seconds`: 요청 처리 시간 히스토그램
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string());

    record_http_request(&method, &path);

    let response = next.run(request).await;

    let status = response.status().as_u16();
    record_http_response(&method, &path, status);
    record_http_duration(&method, &path, start.elapsed().as_secs_f64());

    response
}
