//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use axum::http::StatusCode;
use axum::Json;
use dash_data::DataError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "CATEGORY_NOT_FOUND",
///   "message": "Category 'mega-cap' not found in market-cap",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "CATEGORY_NOT_FOUND", "INTERNAL_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 데이터 계층 에러를 HTTP 응답으로 변환합니다.
///
/// 카테고리 조회 실패는 404, 그 외는 500입니다.
pub fn data_error_response(err: DataError) -> (StatusCode, Json<ApiErrorResponse>) {
    match &err {
        DataError::CategoryNotFound {
            category_type,
            category,
        } => (
            StatusCode::NOT_FOUND,
            Json(ApiErrorResponse::with_details(
                "CATEGORY_NOT_FOUND",
                err.to_string(),
                serde_json::json!({
                    "category_type": category_type,
                    "category": category,
                }),
            )),
        ),
        _ => {
            tracing::error!(error = %err, "요청 처리 실패");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiErrorResponse::new("INTERNAL_ERROR", err.to_string())),
            )
        }
    }
}
