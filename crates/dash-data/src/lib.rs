//! 시세 수집 및 스냅샷 캐시.
//!
//! 이 crate는 다음을 제공합니다:
//! - 외부 시세 Provider 추상화 (`MarketDataProvider`)와 Yahoo Finance 구현
//! - 일봉 이력으로 52주 스냅샷을 계산하는 `SnapshotFetcher`
//! - 배치 단위 갱신을 수행하는 TTL 캐시 (`SnapshotCache`)

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod provider;

pub use cache::{CacheSettings, CacheStatus, FailedSymbol, RefreshReport, SnapshotCache};
pub use error::{DataError, FetchError, Result};
pub use fetcher::{SnapshotFetcher, SnapshotResult};
pub use provider::{CompanyInfo, MarketDataProvider, PriceHistory, YahooMarketDataProvider};
