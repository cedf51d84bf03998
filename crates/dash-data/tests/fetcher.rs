//! SnapshotFetcher 통합 테스트.

mod common;

use common::{fetcher, FakeProvider};
use dash_data::FetchError;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_fetch_computes_snapshot() {
    let provider = FakeProvider::new();
    provider.set_prices("AAA", 98.0, 112.0, 90.0);
    provider.set_info("AAA", "Alpha Industries Ltd", "Industrials");

    let snapshot = fetcher(provider).fetch("AAA").await.unwrap();

    assert_eq!(snapshot.symbol, "AAA");
    assert_eq!(snapshot.company_name, "Alpha Industries Ltd");
    assert_eq!(snapshot.current_price, dec!(98));
    assert_eq!(snapshot.week_52_high, dec!(112));
    assert_eq!(snapshot.week_52_low, dec!(90));
    assert_eq!(snapshot.pct_from_high, dec!(-12.50));
    assert_eq!(snapshot.pct_from_low, dec!(8.89));
    assert_eq!(snapshot.currency, "INR");
    assert_eq!(snapshot.volume, Some(3000));
    assert_eq!(snapshot.avg_volume, Some(dec!(2000)));
    assert_eq!(snapshot.sector.as_deref(), Some("Industrials"));
    assert!(snapshot.industry.is_none());
}

#[tokio::test]
async fn test_fetch_without_metadata_defaults_name() {
    let provider = FakeProvider::new();
    provider.set_prices("BBB", 50.0, 55.0, 40.0);

    let snapshot = fetcher(provider).fetch("BBB").await.unwrap();
    assert_eq!(snapshot.company_name, "BBB");
    assert!(snapshot.sector.is_none());
}

#[tokio::test]
async fn test_fetch_empty_result_is_no_data() {
    let provider = FakeProvider::new();
    provider.set_empty("EMPTY");

    let err = fetcher(provider).fetch("EMPTY").await.unwrap_err();
    assert_eq!(
        err,
        FetchError::NoData {
            symbol: "EMPTY".to_string()
        }
    );
}

#[tokio::test]
async fn test_fetch_upstream_error_is_returned() {
    let provider = FakeProvider::new();
    provider.set_failing("ERR", "HTTP 500");

    let err = fetcher(provider).fetch("ERR").await.unwrap_err();
    assert!(err.to_string().contains("HTTP 500"));
}
