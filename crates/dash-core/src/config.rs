//! 설정 관리.
//!
//! 기본값 → TOML 파일 → 환경 변수(`DASH__SECTION__KEY`) 순으로 병합합니다.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::CategoryTables;

/// 설정 파일 경로를 지정하는 환경 변수.
pub const CONFIG_PATH_ENV: &str = "DASH_CONFIG";

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 캐시 설정
    #[serde(default)]
    pub cache: CacheConfig,
    /// 데이터 수집 설정
    #[serde(default)]
    pub fetch: FetchConfig,
    /// 프론트엔드 정적 파일 설정
    #[serde(default)]
    pub frontend: FrontendConfig,
    /// 추적 대상 종목
    #[serde(default)]
    pub universe: UniverseConfig,
    /// 카테고리 테이블
    #[serde(default)]
    pub categories: CategoryTables,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초). 콜드 스타트 시 전체 갱신이 수십 초 걸릴 수 있음
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// span 진입/종료 이벤트 출력
    pub span_events: bool,
    /// 파일명과 줄 번호 출력
    pub with_file: bool,
    /// 대상(모듈 경로) 출력
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            span_events: false,
            with_file: false,
            with_target: true,
        }
    }
}

/// 캐시 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 캐시 만료 시간 (초)
    pub expiry_secs: u64,
    /// 시작 직후 백그라운드 전체 갱신 여부
    pub warm_on_start: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            expiry_secs: 300,
            warm_on_start: false,
        }
    }
}

impl CacheConfig {
    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry_secs)
    }
}

/// 데이터 수집 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// 배치당 동시 요청 수
    pub batch_size: usize,
    /// 배치 사이 대기 시간 (밀리초)
    pub batch_delay_ms: u64,
    /// 조회 기간 (일)
    pub history_days: u32,
    /// 거래소 접미사 (NSE: ".NS")
    pub exchange_suffix: String,
    /// 통화 코드
    pub currency: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            batch_delay_ms: 500,
            history_days: 365,
            exchange_suffix: ".NS".to_string(),
            currency: "INR".to_string(),
        }
    }
}

impl FetchConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

/// 프론트엔드 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// `index.html`이 위치한 디렉토리
    pub dir: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            dir: "frontend/public".to_string(),
        }
    }
}

/// 종목 유니버스.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UniverseConfig {
    pub symbols: Vec<String>,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("DASH")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// `DASH_CONFIG` 또는 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    /// 설정 값을 검증합니다.
    ///
    /// 유니버스에 없는 카테고리 멤버는 에러가 아니라 경고로 남깁니다.
    pub fn validate(&self) -> CoreResult<()> {
        if self.universe.symbols.is_empty() {
            return Err(CoreError::Config("universe.symbols is empty".to_string()));
        }
        if self.fetch.batch_size == 0 {
            return Err(CoreError::Config(
                "fetch.batch_size must be greater than 0".to_string(),
            ));
        }
        if self.fetch.history_days == 0 {
            return Err(CoreError::Config(
                "fetch.history_days must be greater than 0".to_string(),
            ));
        }
        for kind in crate::types::CategoryType::ALL {
            if self.categories.table(kind).keys().any(|name| name.trim().is_empty()) {
                return Err(CoreError::Config(format!(
                    "empty category name in {}",
                    kind
                )));
            }
        }

        for (kind, category, symbol) in self.categories.orphans(&self.universe.symbols) {
            tracing::warn!(
                category_type = %kind,
                category,
                symbol,
                "카테고리 멤버가 유니버스에 없습니다"
            );
        }

        Ok(())
    }
}
