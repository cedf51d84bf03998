//! 종목 스냅샷.
//!
//! API가 제공하는 종목별 계산 결과입니다. 1년치 일봉으로부터
//! 현재가, 52주 고가/저가, 각각에 대한 괴리율을 담습니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decimal::{percent_change, DecimalExt, Percentage, Price, DISPLAY_DP};

/// 스냅샷의 기본 통화.
pub const DEFAULT_CURRENCY: &str = "INR";

/// 종목 스냅샷.
///
/// 모든 수치는 JSON 숫자로 직렬화됩니다.
///
/// 불변식: `pct_from_high = (current_price - week_52_high) / week_52_high * 100`,
/// `pct_from_low`도 동일한 방식 (둘 다 소수점 2자리).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct StockSnapshot {
    /// 종목 심볼 (예: "RELIANCE")
    pub symbol: String,
    /// 회사명 (메타데이터가 없으면 심볼)
    pub company_name: String,
    /// 현재가 (가장 최근 종가)
    #[serde(with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "utoipa-support", schema(value_type = f64))]
    pub current_price: Price,
    /// 52주 최고가
    #[serde(with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "utoipa-support", schema(value_type = f64))]
    pub week_52_high: Price,
    /// 52주 최저가
    #[serde(with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "utoipa-support", schema(value_type = f64))]
    pub week_52_low: Price,
    /// 52주 최고가 대비 (%)
    #[serde(with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "utoipa-support", schema(value_type = f64))]
    pub pct_from_high: Percentage,
    /// 52주 최저가 대비 (%)
    #[serde(with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "utoipa-support", schema(value_type = f64))]
    pub pct_from_low: Percentage,
    /// 통화 코드
    pub currency: String,
    /// 최근 거래량
    pub volume: Option<u64>,
    /// 기간 평균 거래량
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub avg_volume: Option<Decimal>,
    /// 섹터
    pub sector: Option<String>,
    /// 산업
    pub industry: Option<String>,
}

/// 스냅샷 가격 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevels {
    pub current_price: Price,
    pub week_52_high: Price,
    pub week_52_low: Price,
    pub pct_from_high: Percentage,
    pub pct_from_low: Percentage,
}

impl PriceLevels {
    /// 현재가/고가/저가로부터 괴리율을 계산합니다.
    ///
    /// 괴리율은 반올림 전 가격으로 계산한 뒤 2자리로 반올림하며,
    /// 가격 자체도 2자리로 반올림해 보관합니다.
    /// 고가 또는 저가가 0이면 `None`.
    pub fn compute(current: Price, high: Price, low: Price) -> Option<Self> {
        let pct_from_high = percent_change(current, high)?;
        let pct_from_low = percent_change(current, low)?;

        Some(Self {
            current_price: current.round_half_up(DISPLAY_DP),
            week_52_high: high.round_half_up(DISPLAY_DP),
            week_52_low: low.round_half_up(DISPLAY_DP),
            pct_from_high,
            pct_from_low,
        })
    }
}

impl StockSnapshot {
    /// 가격 정보만으로 스냅샷을 생성합니다. 나머지 필드는 기본값입니다.
    pub fn new(symbol: impl Into<String>, levels: PriceLevels) -> Self {
        let symbol = symbol.into();
        Self {
            company_name: symbol.clone(),
            symbol,
            current_price: levels.current_price,
            week_52_high: levels.week_52_high,
            week_52_low: levels.week_52_low,
            pct_from_high: levels.pct_from_high,
            pct_from_low: levels.pct_from_low,
            currency: DEFAULT_CURRENCY.to_string(),
            volume: None,
            avg_volume: None,
            sector: None,
            industry: None,
        }
    }

    /// 통화를 설정합니다.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// 거래량 정보를 설정합니다.
    pub fn with_volume(mut self, volume: u64, avg_volume: Decimal) -> Self {
        self.volume = Some(volume);
        self.avg_volume = Some(avg_volume);
        self
    }
}
