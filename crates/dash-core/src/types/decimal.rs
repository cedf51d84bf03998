//! 가격/퍼센트 계산을 위한 Decimal 유틸리티.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// 가격 타입.
pub type Price = Decimal;

/// 퍼센트 타입 (1.5 = 1.5%).
pub type Percentage = Decimal;

/// 응답에 노출되는 가격/퍼센트의 소수점 자릿수.
pub const DISPLAY_DP: u32 = 2;

/// Decimal 반올림 확장 트레이트.
pub trait DecimalExt {
    /// 사사오입(0.5는 0에서 먼 쪽)으로 반올림합니다.
    fn round_half_up(&self, dp: u32) -> Decimal;
}

impl DecimalExt for Decimal {
    fn round_half_up(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// 기준가 대비 현재가의 변동률(%)을 계산합니다.
///
/// `(current - reference) / reference * 100`, 소수점 2자리 반올림.
/// 기준가가 0이거나 계산이 Decimal 범위를 넘으면 `None`.
pub fn percent_change(current: Price, reference: Price) -> Option<Percentage> {
    if reference.is_zero() {
        return None;
    }
    let pct = current
        .checked_sub(reference)?
        .checked_div(reference)?
        .checked_mul(dec!(100))?;
    Some(pct.round_half_up(DISPLAY_DP))
}
