//! 갱신 결과 및 캐시 상태 보고.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 갱신 중 실패한 종목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct FailedSymbol {
    pub symbol: String,
    pub error: String,
}

/// 전체 갱신 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct RefreshReport {
    /// 갱신 시작 시각
    pub started_at: DateTime<Utc>,
    /// 요청 종목 수
    pub requested: usize,
    /// 성공 종목 수 (갱신 후 캐시 크기)
    pub succeeded: usize,
    /// 실패 종목
    pub failed: Vec<FailedSymbol>,
    /// 배치 수
    pub batches: usize,
    /// 배치 사이 대기 횟수
    pub pauses: usize,
    /// 소요 시간 (밀리초)
    pub elapsed_ms: u64,
}

/// 캐시 상태.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CacheStatus {
    /// 캐시된 종목 수
    pub entries: usize,
    /// 마지막 전체 갱신 시각
    pub last_refreshed: Option<DateTime<Utc>>,
    /// 마지막 전체 갱신 후 경과 시간 (초)
    pub age_secs: Option<u64>,
    /// 만료 시간 (초)
    pub expiry_secs: u64,
    /// 현재 유효 여부
    pub fresh: bool,
    /// 프로세스 시작 후 전체 갱신 횟수
    pub refresh_count: u64,
    /// 마지막 갱신 결과
    pub last_report: Option<RefreshReport>,
}
