//! 데이터 모듈 오류 타입.

use dash_core::CategoryType;
use thiserror::Error;

/// 종목 단위 수집 오류.
///
/// 배치 갱신 중에는 전파되지 않고 해당 종목의 결과로만 남습니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Provider가 아무 데이터도 반환하지 않음
    #[error("No data available for {symbol}")]
    NoData { symbol: String },

    /// 필수 컬럼 누락
    #[error("Missing required columns for {symbol}: {}", .missing.join(", "))]
    Schema { symbol: String, missing: Vec<String> },

    /// 기타 Provider 오류
    #[error("Upstream error for {symbol}: {message}")]
    Upstream { symbol: String, message: String },

    /// 정규화 후 비어 있는 심볼 (입력 그대로 보관)
    #[error("Invalid symbol '{symbol}': symbol must not be empty")]
    InvalidSymbol { symbol: String },
}

impl FetchError {
    /// 오류가 발생한 종목.
    pub fn symbol(&self) -> &str {
        match self {
            FetchError::NoData { symbol }
            | FetchError::Schema { symbol, .. }
            | FetchError::Upstream { symbol, .. }
            | FetchError::InvalidSymbol { symbol } => symbol,
        }
    }

    /// 메트릭 라벨용 오류 종류.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::NoData { .. } => "no_data",
            FetchError::Schema { .. } => "schema",
            FetchError::Upstream { .. } => "upstream",
            FetchError::InvalidSymbol { .. } => "invalid_symbol",
        }
    }

    pub(crate) fn no_data(symbol: impl Into<String>) -> Self {
        FetchError::NoData {
            symbol: symbol.into(),
        }
    }

    pub(crate) fn upstream(symbol: impl Into<String>, message: impl ToString) -> Self {
        FetchError::Upstream {
            symbol: symbol.into(),
            message: message.to_string(),
        }
    }
}

/// 캐시 관리자 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 알 수 없는 카테고리
    #[error("Category '{category}' not found in {category_type}")]
    CategoryNotFound {
        category_type: String,
        category: String,
    },

    /// 종목 수집 오류
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Provider 연결 실패
    #[error("Provider connection error: {0}")]
    Connection(String),
}

impl DataError {
    pub fn category_not_found(category_type: impl Into<String>, category: impl Into<String>) -> Self {
        DataError::CategoryNotFound {
            category_type: category_type.into(),
            category: category.into(),
        }
    }

    pub(crate) fn unknown_in(category_type: CategoryType, category: &str) -> Self {
        Self::category_not_found(category_type.as_str(), category)
    }
}

/// 데이터 작업을 위한 Result 타입.
pub type Result<T> = std::result::Result<T, DataError>;
