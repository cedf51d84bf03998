//! # Dash Core
//!
//! 52주 신고가/신저가 대시보드의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 종목 스냅샷 (`StockSnapshot`)
//! - 카테고리 테이블 (시가총액 / 기업집단)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
