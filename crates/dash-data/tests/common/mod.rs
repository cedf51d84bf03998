//! 테스트용 가짜 Provider.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dash_core::{CategoryMap, CategoryTables, FetchConfig};
use dash_data::{
    CacheSettings, CompanyInfo, FetchError, MarketDataProvider, PriceHistory, SnapshotCache,
    SnapshotFetcher,
};

#[derive(Debug, Clone)]
enum Behavior {
    Prices { close: f64, high: f64, low: f64 },
    Empty,
    Fail(String),
}

/// 종목별 동작을 지정할 수 있는 Provider.
///
/// 지정되지 않은 종목은 결과 없음으로 처리됩니다.
#[derive(Default)]
pub struct FakeProvider {
    behaviors: Mutex<HashMap<String, Behavior>>,
    info: Mutex<HashMap<String, CompanyInfo>>,
    history_calls: AtomicUsize,
    calls_by_symbol: Mutex<HashMap<String, usize>>,
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_prices(&self, symbol: &str, close: f64, high: f64, low: f64) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(symbol.to_string(), Behavior::Prices { close, high, low });
    }

    pub fn set_empty(&self, symbol: &str) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(symbol.to_string(), Behavior::Empty);
    }

    pub fn set_failing(&self, symbol: &str, message: &str) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(symbol.to_string(), Behavior::Fail(message.to_string()));
    }

    pub fn set_info(&self, symbol: &str, name: &str, sector: &str) {
        self.info.lock().unwrap().insert(
            symbol.to_string(),
            CompanyInfo {
                company_name: Some(name.to_string()),
                sector: Some(sector.to_string()),
                industry: None,
            },
        );
    }

    /// 전체 일봉 조회 횟수.
    pub fn calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, symbol: &str) -> usize {
        self.calls_by_symbol
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    async fn daily_history(
        &self,
        symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Option<PriceHistory>, FetchError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .calls_by_symbol
            .lock()
            .unwrap()
            .entry(symbol.to_string())
            .or_default() += 1;

        let behavior = self.behaviors.lock().unwrap().get(symbol).cloned();
        match behavior {
            Some(Behavior::Prices { close, high, low }) => Ok(Some(
                PriceHistory::new(vec![1, 2])
                    .with_column("Close", vec![close, close])
                    .with_column("High", vec![high, close])
                    .with_column("Low", vec![low, close])
                    .with_column("Volume", vec![1000.0, 3000.0]),
            )),
            Some(Behavior::Fail(message)) => Err(FetchError::Upstream {
                symbol: symbol.to_string(),
                message,
            }),
            Some(Behavior::Empty) | None => Ok(None),
        }
    }

    async fn company_info(&self, symbol: &str) -> Option<CompanyInfo> {
        self.info.lock().unwrap().get(symbol).cloned()
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub fn symbols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn sample_categories() -> CategoryTables {
    let mut market_cap = CategoryMap::new();
    market_cap.insert("large-cap".to_string(), symbols(&["AAA", "BBB"]));
    market_cap.insert("small-cap".to_string(), symbols(&["CCC", "ZZZ"]));
    let mut business = CategoryMap::new();
    business.insert("abc-group".to_string(), symbols(&["AAA", "CCC"]));
    CategoryTables::new(market_cap, business)
}

/// AAA/BBB/CCC 세 종목이 정상 응답하는 Provider.
pub fn healthy_provider() -> Arc<FakeProvider> {
    let provider = FakeProvider::new();
    provider.set_prices("AAA", 100.0, 120.0, 80.0);
    provider.set_prices("BBB", 50.0, 55.0, 40.0);
    provider.set_prices("CCC", 10.0, 20.0, 5.0);
    provider
}

pub fn fetcher(provider: Arc<FakeProvider>) -> Arc<SnapshotFetcher> {
    Arc::new(SnapshotFetcher::new(provider, &FetchConfig::default()))
}

pub fn build_cache(
    provider: Arc<FakeProvider>,
    universe: &[&str],
    settings: CacheSettings,
) -> SnapshotCache {
    SnapshotCache::new(
        fetcher(provider),
        symbols(universe),
        Arc::new(sample_categories()),
        settings,
    )
}
