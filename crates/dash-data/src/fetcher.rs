//! 종목 스냅샷 수집기.
//!
//! Provider에서 일봉 이력과 회사 정보를 받아 52주 스냅샷을 계산합니다.
//! 종목 단위 실패는 `FetchError`로 반환되며 호출자에게 전파되지 않습니다.

use std::sync::Arc;

use chrono::{Duration, Utc};
use dash_core::{DecimalExt, FetchConfig, PriceLevels, StockSnapshot, DISPLAY_DP};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::provider::{MarketDataProvider, PriceHistory};

/// 종목 하나의 수집 결과.
pub type SnapshotResult = Result<StockSnapshot, FetchError>;

const REQUIRED_COLUMNS: [&str; 3] = ["high", "low", "close"];

/// 스냅샷 수집기.
pub struct SnapshotFetcher {
    provider: Arc<dyn MarketDataProvider>,
    history_days: u32,
    currency: String,
}

impl SnapshotFetcher {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: &FetchConfig) -> Self {
        Self {
            provider,
            history_days: config.history_days,
            currency: config.currency.clone(),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// 종목 스냅샷을 수집합니다.
    pub async fn fetch(&self, symbol: &str) -> SnapshotResult {
        debug!(symbol, provider = self.provider.name(), "스냅샷 수집 시작");

        let result = self.fetch_inner(symbol).await;
        match &result {
            Ok(snapshot) => info!(
                symbol,
                current_price = %snapshot.current_price,
                week_52_high = %snapshot.week_52_high,
                week_52_low = %snapshot.week_52_low,
                "스냅샷 수집 완료"
            ),
            Err(e) => {
                warn!(symbol, error = %e, "스냅샷 수집 실패");
                metrics::counter!("dash_fetch_failures_total", "kind" => e.kind()).increment(1);
            }
        }
        result
    }

    async fn fetch_inner(&self, symbol: &str) -> SnapshotResult {
        let end = Utc::now();
        let start = end - Duration::days(i64::from(self.history_days));

        let history = self
            .provider
            .daily_history(symbol, start, end)
            .await?
            .filter(|h| !h.is_empty())
            .ok_or_else(|| FetchError::no_data(symbol))?;

        let stats = HistoryStats::from_history(symbol, &history)?;
        let mut snapshot = StockSnapshot::new(symbol, stats.levels).with_currency(&self.currency);
        snapshot.volume = stats.volume;
        snapshot.avg_volume = stats.avg_volume;

        if let Some(info) = self.provider.company_info(symbol).await {
            if let Some(name) = info.company_name.filter(|n| !n.trim().is_empty()) {
                snapshot.company_name = name;
            }
            snapshot.sector = info.sector;
            snapshot.industry = info.industry;
        }

        Ok(snapshot)
    }
}

/// 일봉 이력에서 계산한 지표.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStats {
    pub levels: PriceLevels,
    pub volume: Option<u64>,
    pub avg_volume: Option<Decimal>,
}

impl HistoryStats {
    /// 현재가(마지막 종가), 52주 고가(고가 최대), 52주 저가(저가 최소)를 계산합니다.
    ///
    /// NaN/inf 값은 건너뜁니다.
    pub fn from_history(symbol: &str, history: &PriceHistory) -> Result<Self, FetchError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !history.has_column(name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(FetchError::Schema {
                symbol: symbol.to_string(),
                missing,
            });
        }

        let close = finite(history.column("close"));
        let high = finite(history.column("high"));
        let low = finite(history.column("low"));

        let current = close.last().copied();
        let week_52_high = high.iter().copied().reduce(f64::max);
        let week_52_low = low.iter().copied().reduce(f64::min);

        let (current, week_52_high, week_52_low) = match (current, week_52_high, week_52_low) {
            (Some(c), Some(h), Some(l)) => (c, h, l),
            _ => return Err(FetchError::no_data(symbol)),
        };

        let levels = to_decimal(current)
            .zip(to_decimal(week_52_high))
            .zip(to_decimal(week_52_low))
            .and_then(|((c, h), l)| PriceLevels::compute(c, h, l))
            .ok_or_else(|| FetchError::no_data(symbol))?;

        let volumes = history.column("volume").map(|v| finite(Some(v)));
        let volume = volumes
            .as_ref()
            .and_then(|v| v.last())
            .and_then(|v| v.max(0.0).round().to_u64());
        let avg_volume = volumes
            .as_ref()
            .filter(|v| !v.is_empty())
            .and_then(|v| to_decimal(v.iter().sum::<f64>() / v.len() as f64))
            .map(|avg| avg.round_half_up(DISPLAY_DP));

        Ok(Self {
            levels,
            volume,
            avg_volume,
        })
    }
}

fn finite(values: Option<&[f64]>) -> Vec<f64> {
    values
        .unwrap_or_default()
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .collect()
}

fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn abc_history() -> PriceHistory {
        PriceHistory::new(vec![1, 2, 3])
            .with_column("Close", vec![100.0, 105.0, 98.0])
            .with_column("High", vec![110.0, 112.0, 108.0])
            .with_column("Low", vec![95.0, 90.0, 92.0])
    }

    #[test]
    fn test_stats_example() {
        let stats = HistoryStats::from_history("ABC", &abc_history()).unwrap();

        assert_eq!(stats.levels.current_price, dec!(98.00));
        assert_eq!(stats.levels.week_52_high, dec!(112.00));
        assert_eq!(stats.levels.week_52_low, dec!(90.00));
        assert_eq!(stats.levels.pct_from_high, dec!(-12.50));
        assert_eq!(stats.levels.pct_from_low, dec!(8.89));
        assert!(stats.volume.is_none());
        assert!(stats.avg_volume.is_none());
    }

    #[test]
    fn test_stats_volume() {
        let history = abc_history().with_column("Volume", vec![1000.0, 2000.0, 1500.0]);
        let stats = HistoryStats::from_history("ABC", &history).unwrap();

        assert_eq!(stats.volume, Some(1500));
        assert_eq!(stats.avg_volume, Some(dec!(1500)));
    }

    #[test]
    fn test_stats_missing_columns() {
        let history = PriceHistory::new(vec![1]).with_column("Close", vec![10.0]);
        let err = HistoryStats::from_history("ABC", &history).unwrap_err();

        assert_eq!(
            err,
            FetchError::Schema {
                symbol: "ABC".to_string(),
                missing: vec!["high".to_string(), "low".to_string()],
            }
        );
    }

    #[test]
    fn test_stats_skips_non_finite() {
        let history = PriceHistory::new(vec![1, 2, 3])
            .with_column("close", vec![100.0, 101.0, f64::NAN])
            .with_column("high", vec![110.0, f64::INFINITY, 105.0])
            .with_column("low", vec![f64::NAN, 90.0, 95.0]);
        let stats = HistoryStats::from_history("ABC", &history).unwrap();

        assert_eq!(stats.levels.current_price, dec!(101));
        assert_eq!(stats.levels.week_52_high, dec!(110));
        assert_eq!(stats.levels.week_52_low, dec!(90));
    }

    #[test]
    fn test_stats_all_nan_is_no_data() {
        let history = PriceHistory::new(vec![1])
            .with_column("close", vec![f64::NAN])
            .with_column("high", vec![f64::NAN])
            .with_column("low", vec![f64::NAN]);
        let err = HistoryStats::from_history("ABC", &history).unwrap_err();
        assert!(matches!(err, FetchError::NoData { .. }));
    }

    #[test]
    fn test_stats_out_of_range_ratio_is_no_data() {
        let history = PriceHistory::new(vec![1])
            .with_column("close", vec![1e10])
            .with_column("high", vec![1e10])
            .with_column("low", vec![1e-20]);
        let err = HistoryStats::from_history("ABC", &history).unwrap_err();
        assert!(matches!(err, FetchError::NoData { .. }));
    }

    #[test]
    fn test_stats_zero_low_is_no_data() {
        let history = PriceHistory::new(vec![1])
            .with_column("close", vec![1.0])
            .with_column("high", vec![2.0])
            .with_column("low", vec![0.0]);
        let err = HistoryStats::from_history("ABC", &history).unwrap_err();
        assert!(matches!(err, FetchError::NoData { .. }));
    }
}
