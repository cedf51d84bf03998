//! 배치 단위 수집.
//!
//! 유니버스를 고정 크기 배치로 나누어 배치 내 종목은 동시에 수집하고,
//! 배치 사이에는 Provider 요청 제한을 위해 일정 시간 대기합니다.

use std::time::Duration;

use futures::future::join_all;
use tracing::debug;

use crate::fetcher::{SnapshotFetcher, SnapshotResult};

/// 배치 수집 결과.
#[derive(Debug)]
pub struct BatchOutcome {
    /// 입력 순서대로의 종목별 결과
    pub results: Vec<SnapshotResult>,
    pub batches: usize,
    pub pauses: usize,
}

/// 종목 목록을 배치로 나누어 수집합니다.
///
/// N개 종목, 배치 크기 B일 때 `ceil(N/B)`개의 배치와 `ceil(N/B) - 1`번의 대기가 발생합니다.
/// 한 종목의 실패는 같은 배치나 이후 배치에 영향을 주지 않습니다.
pub async fn fetch_in_batches(
    fetcher: &SnapshotFetcher,
    symbols: &[String],
    batch_size: usize,
    delay: Duration,
) -> BatchOutcome {
    let batch_size = batch_size.max(1);
    let total_batches = symbols.len().div_ceil(batch_size);
    let mut results = Vec::with_capacity(symbols.len());
    let mut pauses = 0;

    for (index, batch) in symbols.chunks(batch_size).enumerate() {
        debug!(batch = index + 1, total_batches, size = batch.len(), "배치 수집");

        let batch_results = join_all(batch.iter().map(|symbol| fetcher.fetch(symbol))).await;
        results.extend(batch_results);

        if index + 1 < total_batches {
            tokio::time::sleep(delay).await;
            pauses += 1;
        }
    }

    BatchOutcome {
        results,
        batches: total_batches,
        pauses,
    }
}
