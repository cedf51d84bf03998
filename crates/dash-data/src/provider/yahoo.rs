//! Yahoo Finance 기반 시세 Provider.
//!
//! NSE 종목은 `.NS` 접미사를 붙여 조회합니다 (예: "RELIANCE" → "RELIANCE.NS").

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

use super::{CompanyInfo, MarketDataProvider, PriceHistory};
use crate::error::{DataError, FetchError};

/// Yahoo Finance 조회용 심볼로 변환합니다.
///
/// 이미 접미사가 있거나 지수(`^`)인 경우 그대로 사용합니다.
pub fn to_upstream_symbol(symbol: &str, suffix: &str) -> String {
    if suffix.is_empty() || symbol.starts_with('^') || symbol.contains('.') {
        symbol.to_string()
    } else {
        format!("{}{}", symbol, suffix)
    }
}

/// Yahoo Finance 시세 Provider.
pub struct YahooMarketDataProvider {
    connector: yahoo::YahooConnector,
    /// get_ticker_info는 &mut self 필요
    info_connector: Mutex<yahoo::YahooConnector>,
    exchange_suffix: String,
}

impl YahooMarketDataProvider {
    /// 새 Provider 생성.
    pub fn new(exchange_suffix: impl Into<String>) -> Result<Self, DataError> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| DataError::Connection(format!("Yahoo Finance 연결 실패: {}", e)))?;
        let info_connector = yahoo::YahooConnector::new()
            .map_err(|e| DataError::Connection(format!("Yahoo Finance 연결 실패: {}", e)))?;

        Ok(Self {
            connector,
            info_connector: Mutex::new(info_connector),
            exchange_suffix: exchange_suffix.into(),
        })
    }

    fn upstream_symbol(&self, symbol: &str) -> String {
        to_upstream_symbol(symbol, &self.exchange_suffix)
    }
}

fn to_offset_datetime(symbol: &str, dt: DateTime<Utc>) -> Result<OffsetDateTime, FetchError> {
    OffsetDateTime::from_unix_timestamp(dt.timestamp())
        .map_err(|e| FetchError::upstream(symbol, format!("invalid timestamp: {}", e)))
}

#[async_trait]
impl MarketDataProvider for YahooMarketDataProvider {
    async fn daily_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<PriceHistory>, FetchError> {
        let yahoo_symbol = self.upstream_symbol(symbol);
        let start = to_offset_datetime(symbol, start)?;
        let end = to_offset_datetime(symbol, end)?;

        debug!(symbol, yahoo_symbol = %yahoo_symbol, "Yahoo Finance 일봉 조회");

        let response = self
            .connector
            .get_quote_history_interval(&yahoo_symbol, start, end, "1d")
            .await
            .map_err(|e| FetchError::upstream(symbol, format!("Yahoo Finance API 오류: {}", e)))?;

        let quotes = response
            .quotes()
            .map_err(|e| FetchError::upstream(symbol, format!("Quote 파싱 오류: {}", e)))?;

        if quotes.is_empty() {
            return Ok(None);
        }

        let mut quotes = quotes;
        quotes.sort_by_key(|q| q.timestamp);

        let history = PriceHistory::new(quotes.iter().map(|q| q.timestamp as i64).collect())
            .with_column("Open", quotes.iter().map(|q| q.open).collect())
            .with_column("High", quotes.iter().map(|q| q.high).collect())
            .with_column("Low", quotes.iter().map(|q| q.low).collect())
            .with_column("Close", quotes.iter().map(|q| q.close).collect())
            .with_column("Volume", quotes.iter().map(|q| q.volume as f64).collect());

        debug!(symbol, rows = history.len(), "일봉 수신");
        Ok(Some(history))
    }

    async fn company_info(&self, symbol: &str) -> Option<CompanyInfo> {
        let yahoo_symbol = self.upstream_symbol(symbol);

        let summary = {
            let mut connector = self.info_connector.lock().await;
            connector.get_ticker_info(&yahoo_symbol).await
        };

        let summary = match summary {
            Ok(summary) => summary,
            Err(e) => {
                warn!(symbol, error = %e, "회사 정보 조회 실패");
                return None;
            }
        };

        let result_data = summary
            .quote_summary
            .and_then(|qs| qs.result)
            .and_then(|r| r.into_iter().next())?;

        let company_name = result_data
            .quote_type
            .as_ref()
            .and_then(|qt| qt.long_name.clone().or(qt.short_name.clone()));
        let profile = result_data.asset_profile.as_ref();

        Some(CompanyInfo {
            company_name,
            sector: profile.and_then(|p| p.sector.clone()),
            industry: profile.and_then(|p| p.industry.clone()),
        })
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_upstream_symbol() {
        assert_eq!(to_upstream_symbol("RELIANCE", ".NS"), "RELIANCE.NS");
        assert_eq!(to_upstream_symbol("M&M", ".NS"), "M&M.NS");
        assert_eq!(to_upstream_symbol("TCS.BO", ".NS"), "TCS.BO");
        assert_eq!(to_upstream_symbol("^NSEI", ".NS"), "^NSEI");
        assert_eq!(to_upstream_symbol("AAPL", ""), "AAPL");
    }

    #[tokio::test]
    #[ignore] // 실제 API 호출 필요
    async fn test_daily_history_integration() {
        let provider = YahooMarketDataProvider::new(".NS").expect("Provider 생성 실패");
        let end = Utc::now();
        let start = end - chrono::Duration::days(30);

        let history = provider
            .daily_history("RELIANCE", start, end)
            .await
            .expect("조회 실패")
            .expect("데이터 없음");

        assert!(!history.is_empty());
        assert!(history.has_column("close"));
        println!("RELIANCE rows: {}", history.len());
    }

    #[tokio::test]
    #[ignore] // 실제 API 호출 필요
    async fn test_company_info_integration() {
        let provider = YahooMarketDataProvider::new(".NS").expect("Provider 생성 실패");
        let info = provider.company_info("TCS").await;
        println!("TCS info: {:?}", info);
    }
}
