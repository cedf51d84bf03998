//! 시세 데이터 Provider.
//!
//! 외부 시세 소스에 대한 추상화입니다. 일봉 이력은 컬럼 지향 프레임
//! (`PriceHistory`)으로 반환되며, 컬럼 이름은 소스의 표기를 그대로 유지합니다.

mod yahoo;

pub use yahoo::{to_upstream_symbol, YahooMarketDataProvider};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::FetchError;

/// 일봉 이력 프레임.
///
/// 행은 타임스탬프 오름차순이며, 각 컬럼은 행 수와 같은 길이를 가집니다.
/// 컬럼 조회는 대소문자를 구분하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    timestamps: Vec<i64>,
    columns: Vec<(String, Vec<f64>)>,
}

impl PriceHistory {
    /// 행 타임스탬프(unix 초)로 빈 프레임을 생성합니다.
    pub fn new(timestamps: Vec<i64>) -> Self {
        Self {
            timestamps,
            columns: Vec::new(),
        }
    }

    /// 컬럼을 추가합니다. 같은 이름의 컬럼이 있으면 교체합니다.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        let name = name.into();
        match self
            .columns
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => *slot = (name, values),
            None => self.columns.push((name, values)),
        }
        self
    }

    /// 이름으로 컬럼을 조회합니다 (대소문자 무시).
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// 행 수.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// 회사 메타데이터.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyInfo {
    pub company_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

/// 시세 데이터 제공자 트레잇.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 기간 내 일봉 이력 조회.
    ///
    /// 소스가 결과를 반환하지 않으면 `Ok(None)`.
    async fn daily_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<PriceHistory>, FetchError>;

    /// 회사 메타데이터 조회. 실패는 `None`으로 처리합니다.
    async fn company_info(&self, symbol: &str) -> Option<CompanyInfo>;

    /// 로그용 Provider 이름.
    fn name(&self) -> &'static str {
        "unknown"
    }
}
