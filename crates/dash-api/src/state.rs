//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다.

use std::path::PathBuf;
use std::sync::Arc;

use dash_core::{AppConfig, CategoryTables};
use dash_data::{CacheSettings, MarketDataProvider, SnapshotCache, SnapshotFetcher};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 종목 스냅샷 캐시
    pub cache: Arc<SnapshotCache>,

    /// 카테고리 테이블 (시작 시 로드, 불변)
    pub categories: Arc<CategoryTables>,

    /// 프론트엔드 정적 파일 디렉토리
    pub frontend_dir: PathBuf,

    /// 서버 시작 시간
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 캐시로부터 AppState 생성.
    pub fn new(cache: Arc<SnapshotCache>, frontend_dir: impl Into<PathBuf>) -> Self {
        let categories = Arc::new(cache.categories().clone());
        Self {
            cache,
            categories,
            frontend_dir: frontend_dir.into(),
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 설정과 Provider로 수집기, 캐시를 구성합니다.
    pub fn from_config(config: &AppConfig, provider: Arc<dyn MarketDataProvider>) -> Self {
        let fetcher = Arc::new(SnapshotFetcher::new(provider, &config.fetch));
        let cache = Arc::new(SnapshotCache::new(
            fetcher,
            config.universe.symbols.clone(),
            Arc::new(config.categories.clone()),
            CacheSettings::from_config(&config.cache, &config.fetch),
        ));

        Self::new(cache, &config.frontend.dir)
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 외부 호출 없이 고정 가격을 반환하는 Provider를 사용합니다.
/// 유니버스는 RELIANCE, TCS, INFY이며 INFY는 항상 실패합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use dash_core::{CategoryMap, FetchConfig};

    let mut market_cap = CategoryMap::new();
    market_cap.insert(
        "large-cap".to_string(),
        vec!["RELIANCE".to_string(), "TCS".to_string(), "INFY".to_string()],
    );
    let mut business = CategoryMap::new();
    business.insert("tata-group".to_string(), vec!["TCS".to_string()]);

    let fetcher = Arc::new(SnapshotFetcher::new(
        Arc::new(test_support::StaticProvider),
        &FetchConfig::default(),
    ));
    let cache = Arc::new(SnapshotCache::new(
        fetcher,
        vec!["RELIANCE".to_string(), "TCS".to_string(), "INFY".to_string()],
        Arc::new(CategoryTables::new(market_cap, business)),
        CacheSettings {
            batch_delay: std::time::Duration::ZERO,
            ..CacheSettings::default()
        },
    ));

    AppState::new(cache, std::env::temp_dir())
}

#[cfg(any(test, feature = "test-utils"))]
mod test_support {
    use chrono::{DateTime, Utc};
    use dash_data::{CompanyInfo, FetchError, MarketDataProvider, PriceHistory};

    /// 고정 가격 Provider.
    pub struct StaticProvider;

    #[async_trait::async_trait]
    impl MarketDataProvider for StaticProvider {
        async fn daily_history(
            &self,
            symbol: &str,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Option<PriceHistory>, FetchError> {
            let (close, high, low) = match symbol {
                "RELIANCE" => (2900.0, 3200.0, 2200.0),
                "TCS" => (98.0, 112.0, 90.0),
                "INFY" => {
                    return Err(FetchError::Upstream {
                        symbol: symbol.to_string(),
                        message: "rate limited".to_string(),
                    })
                }
                _ => return Ok(None),
            };

            Ok(Some(
                PriceHistory::new(vec![1, 2])
                    .with_column("Close", vec![close - 1.0, close])
                    .with_column("High", vec![high, close])
                    .with_column("Low", vec![low, close]),
            ))
        }

        async fn company_info(&self, symbol: &str) -> Option<CompanyInfo> {
            (symbol == "TCS").then(|| CompanyInfo {
                company_name: Some("Tata Consultancy Services Limited".to_string()),
                sector: Some("Technology".to_string()),
                industry: Some("Information Technology Services".to_string()),
            })
        }
    }
}
