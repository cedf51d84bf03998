//! 스냅샷 TTL 캐시.
//!
//! 전체 종목 스냅샷을 하나의 단위로 캐싱합니다. 마지막 전체 갱신 후
//! 만료 시간이 지나면 캐시 전체가 stale로 간주되며, 다음 요청이
//! 배치 단위 전체 갱신을 수행합니다.
//!
//! # 갱신 규칙
//!
//! - 전체 갱신은 캐시 내용을 성공한 종목으로 통째로 교체합니다.
//!   이번 갱신에서 실패한 종목은 이전 값이 남지 않고 제거됩니다.
//! - 단일 종목 조회(`get_one`)는 성공 시 해당 종목만 추가/교체하며
//!   마지막 갱신 시각은 바꾸지 않습니다.
//! - 동시에 여러 요청이 stale 캐시를 만나도 전체 갱신은 한 번만 수행됩니다.

mod batch;
mod report;

pub use batch::{fetch_in_batches, BatchOutcome};
pub use report::{CacheStatus, FailedSymbol, RefreshReport};

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dash_core::{
    normalize_symbol, CacheConfig, CategoryTables, CategoryType, FetchConfig, StockSnapshot,
};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{DataError, FetchError, Result};
use crate::fetcher::{SnapshotFetcher, SnapshotResult};

/// 캐시 동작 설정.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// 만료 시간
    pub expiry: Duration,
    /// 배치 크기
    pub batch_size: usize,
    /// 배치 사이 대기 시간
    pub batch_delay: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default(), &FetchConfig::default())
    }
}

impl CacheSettings {
    pub fn from_config(cache: &CacheConfig, fetch: &FetchConfig) -> Self {
        Self {
            expiry: cache.expiry(),
            batch_size: fetch.batch_size,
            batch_delay: fetch.batch_delay(),
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: BTreeMap<String, StockSnapshot>,
    refreshed_at: Option<Instant>,
    refreshed_wall: Option<DateTime<Utc>>,
    refresh_count: u64,
    last_report: Option<RefreshReport>,
}

impl CacheState {
    fn is_fresh(&self, expiry: Duration, now: Instant) -> bool {
        self.refreshed_at
            .is_some_and(|at| now.saturating_duration_since(at) <= expiry)
    }
}

/// 종목 스냅샷 캐시 관리자.
pub struct SnapshotCache {
    fetcher: Arc<SnapshotFetcher>,
    universe: Vec<String>,
    categories: Arc<CategoryTables>,
    settings: CacheSettings,
    state: RwLock<CacheState>,
    /// 전체 갱신 직렬화
    refresh_lock: Mutex<()>,
}

impl SnapshotCache {
    /// 빈 캐시를 생성합니다.
    ///
    /// 유니버스 심볼은 공백 제거 및 대문자 변환 후 중복을 제거합니다.
    /// 카테고리 멤버도 같은 방식으로 정규화합니다.
    pub fn new(
        fetcher: Arc<SnapshotFetcher>,
        universe: Vec<String>,
        categories: Arc<CategoryTables>,
        settings: CacheSettings,
    ) -> Self {
        let mut seen = BTreeSet::new();
        let universe = universe
            .iter()
            .map(|s| normalize_symbol(s))
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();

        Self {
            fetcher,
            universe,
            categories: Arc::new(categories.normalized()),
            settings,
            state: RwLock::new(CacheState::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    pub fn categories(&self) -> &CategoryTables {
        &self.categories
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// 캐시가 유효한지 확인합니다.
    pub async fn is_fresh(&self) -> bool {
        self.state
            .read()
            .await
            .is_fresh(self.settings.expiry, Instant::now())
    }

    /// 전체 종목 스냅샷 (심볼 오름차순).
    ///
    /// 캐시가 stale이면 전체 갱신 후 반환합니다.
    pub async fn get_all(&self) -> Vec<StockSnapshot> {
        self.ensure_fresh().await;
        self.state.read().await.entries.values().cloned().collect()
    }

    /// 단일 종목 스냅샷.
    ///
    /// 캐시가 유효하고 종목이 있으면 캐시 값을, 아니면 새로 수집합니다.
    /// 수집 성공 시 캐시에 반영하며 실패 결과는 캐시하지 않습니다.
    pub async fn get_one(&self, symbol: &str) -> SnapshotResult {
        let raw = symbol;
        let symbol = normalize_symbol(raw);
        if symbol.is_empty() {
            return Err(FetchError::InvalidSymbol {
                symbol: raw.to_string(),
            });
        }

        {
            let state = self.state.read().await;
            if state.is_fresh(self.settings.expiry, Instant::now()) {
                if let Some(snapshot) = state.entries.get(&symbol) {
                    debug!(symbol = %symbol, "캐시 적중");
                    return Ok(snapshot.clone());
                }
            }
        }

        let snapshot = self.fetcher.fetch(&symbol).await?;
        let mut state = self.state.write().await;
        state.entries.insert(symbol, snapshot.clone());
        metrics::gauge!("dash_cache_entries").set(state.entries.len() as f64);

        Ok(snapshot)
    }

    /// 카테고리에 속한 종목 스냅샷 (심볼 오름차순).
    ///
    /// 알 수 없는 카테고리 종류나 카테고리는 캐시 상태와 관계없이
    /// `CategoryNotFound`를 반환합니다.
    pub async fn get_by_category(
        &self,
        category_type: &str,
        category: &str,
    ) -> Result<Vec<StockSnapshot>> {
        let kind: CategoryType = category_type
            .parse()
            .map_err(|_| DataError::category_not_found(category_type, category))?;
        let members = self
            .categories
            .members(kind, category)
            .ok_or_else(|| DataError::unknown_in(kind, category))?;

        self.ensure_fresh().await;

        let state = self.state.read().await;
        Ok(state
            .entries
            .values()
            .filter(|snapshot| members.contains(snapshot.symbol.as_str()))
            .cloned()
            .collect())
    }

    /// 캐시가 stale이면 전체 갱신을 수행합니다.
    ///
    /// 갱신 락을 얻은 뒤 다시 확인하므로, 다른 요청이 먼저 갱신을
    /// 끝냈다면 `None`을 반환합니다.
    pub async fn ensure_fresh(&self) -> Option<RefreshReport> {
        if self.is_fresh().await {
            return None;
        }

        let _guard = self.refresh_lock.lock().await;
        if self.is_fresh().await {
            debug!("다른 요청이 이미 갱신을 완료함");
            return None;
        }

        Some(self.run_refresh().await)
    }

    /// 캐시 상태와 관계없이 전체 갱신을 수행합니다.
    pub async fn refresh(&self) -> RefreshReport {
        let _guard = self.refresh_lock.lock().await;
        self.run_refresh().await
    }

    /// 캐시를 stale로 표시합니다. 다음 요청이 전체 갱신을 수행합니다.
    ///
    /// 항목과 마지막 갱신 결과는 남지만 갱신 시각은 모두 지워집니다.
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.refreshed_at = None;
        state.refreshed_wall = None;
        info!(entries = state.entries.len(), "캐시 무효화");
    }

    /// 캐시 상태.
    pub async fn status(&self) -> CacheStatus {
        let state = self.state.read().await;
        let now = Instant::now();

        CacheStatus {
            entries: state.entries.len(),
            last_refreshed: state.refreshed_wall,
            age_secs: state
                .refreshed_at
                .map(|at| now.saturating_duration_since(at).as_secs()),
            expiry_secs: self.settings.expiry.as_secs(),
            fresh: state.is_fresh(self.settings.expiry, now),
            refresh_count: state.refresh_count,
            last_report: state.last_report.clone(),
        }
    }

    /// 갱신 락을 잡은 상태에서 호출해야 합니다.
    async fn run_refresh(&self) -> RefreshReport {
        let started = Instant::now();
        let started_at = Utc::now();

        info!(
            symbols = self.universe.len(),
            batch_size = self.settings.batch_size,
            provider = self.fetcher.provider_name(),
            "전체 갱신 시작"
        );

        let outcome = fetch_in_batches(
            &self.fetcher,
            &self.universe,
            self.settings.batch_size,
            self.settings.batch_delay,
        )
        .await;

        let mut entries = BTreeMap::new();
        let mut failed = Vec::new();
        for result in outcome.results {
            match result {
                Ok(snapshot) => {
                    entries.insert(snapshot.symbol.clone(), snapshot);
                }
                Err(e) => failed.push(FailedSymbol {
                    symbol: e.symbol().to_string(),
                    error: e.to_string(),
                }),
            }
        }

        let elapsed = started.elapsed();
        let report = RefreshReport {
            started_at,
            requested: self.universe.len(),
            succeeded: entries.len(),
            failed,
            batches: outcome.batches,
            pauses: outcome.pauses,
            elapsed_ms: elapsed.as_millis() as u64,
        };

        {
            let mut state = self.state.write().await;
            state.entries = entries;
            state.refreshed_at = Some(Instant::now());
            state.refreshed_wall = Some(Utc::now());
            state.refresh_count += 1;
            state.last_report = Some(report.clone());
        }

        metrics::counter!("dash_cache_refreshes_total").increment(1);
        metrics::gauge!("dash_cache_entries").set(report.succeeded as f64);
        metrics::histogram!("dash_cache_refresh_duration_seconds").record(elapsed.as_secs_f64());

        if report.failed.is_empty() {
            info!(
                succeeded = report.succeeded,
                batches = report.batches,
                elapsed_ms = report.elapsed_ms,
                "전체 갱신 완료"
            );
        } else {
            warn!(
                succeeded = report.succeeded,
                failed = report.failed.len(),
                batches = report.batches,
                elapsed_ms = report.elapsed_ms,
                "전체 갱신 완료 (일부 실패)"
            );
        }

        report
    }
}
