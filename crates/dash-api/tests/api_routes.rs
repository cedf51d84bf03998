//! API 라우터 통합 테스트.
//!
//! 가짜 Provider로 전체 라우터(API + 프론트엔드)를 구성하고
//! 실제 요청 흐름을 검증합니다.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use dash_api::routes::{create_api_router, frontend_router};
use dash_api::AppState;
use dash_core::{CategoryMap, CategoryTables, FetchConfig};
use dash_data::{
    CacheSettings, FetchError, MarketDataProvider, PriceHistory, SnapshotCache, SnapshotFetcher,
};
use serde_json::Value;
use tower::ServiceExt;

/// 종목별 (종가, 고가, 저가)를 반환하는 Provider.
struct TableProvider {
    prices: HashMap<&'static str, (f64, f64, f64)>,
    calls: AtomicUsize,
}

#[async_trait]
impl MarketDataProvider for TableProvider {
    async fn daily_history(
        &self,
        symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Option<PriceHistory>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if symbol == "BROKEN" {
            return Err(FetchError::Upstream {
                symbol: symbol.to_string(),
                message: "connection reset".to_string(),
            });
        }

        Ok(self.prices.get(symbol).map(|&(close, high, low)| {
            PriceHistory::new(vec![1])
                .with_column("Close", vec![close])
                .with_column("High", vec![high])
                .with_column("Low", vec![low])
                .with_column("Volume", vec![1200.0])
        }))
    }

    async fn company_info(&self, _symbol: &str) -> Option<dash_data::CompanyInfo> {
        None
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

struct Harness {
    app: Router,
    provider: Arc<TableProvider>,
    _dir: PathBuf,
}

fn harness() -> Harness {
    let provider = Arc::new(TableProvider {
        prices: HashMap::from([
            ("ABC", (98.0, 112.0, 90.0)),
            ("XYZ", (50.0, 100.0, 25.0)),
            ("MNO", (10.0, 10.0, 10.0)),
        ]),
        calls: AtomicUsize::new(0),
    });

    let mut market_cap = CategoryMap::new();
    market_cap.insert(
        "large-cap".to_string(),
        vec!["ABC".to_string(), "XYZ".to_string()],
    );
    market_cap.insert("small-cap".to_string(), vec!["BROKEN".to_string()]);
    let mut business = CategoryMap::new();
    business.insert(
        "abc-group".to_string(),
        vec!["ABC".to_string(), "MNO".to_string()],
    );

    let fetcher = Arc::new(SnapshotFetcher::new(provider.clone(), &FetchConfig::default()));
    let cache = Arc::new(SnapshotCache::new(
        fetcher,
        ["XYZ", "ABC", "MNO", "BROKEN"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        Arc::new(CategoryTables::new(market_cap, business)),
        CacheSettings {
            expiry: Duration::from_secs(300),
            batch_size: 2,
            batch_delay: Duration::ZERO,
        },
    ));

    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);
    let dir = std::env::temp_dir().join(format!(
        "dash-api-routes-{}-{}",
        std::process::id(),
        NEXT_DIR.fetch_add(1, Ordering::SeqCst)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<title>52-Week Dash</title>").unwrap();

    let state = Arc::new(AppState::new(cache, &dir));
    let app = create_api_router()
        .with_state(state)
        .merge(frontend_router(&dir));

    Harness {
        app,
        provider,
        _dir: dir,
    }
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, "GET", uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn symbols(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["symbol"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_stocks_sorted_and_failures_dropped() {
    let h = harness();

    let (status, json) = get_json(&h.app, "/api/stocks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(symbols(&json), vec!["ABC", "MNO", "XYZ"]);

    let abc = &json[0];
    assert_eq!(abc["current_price"].as_f64(), Some(98.0));
    assert_eq!(abc["week_52_high"].as_f64(), Some(112.0));
    assert_eq!(abc["week_52_low"].as_f64(), Some(90.0));
    assert_eq!(abc["pct_from_high"].as_f64(), Some(-12.5));
    assert!((abc["pct_from_low"].as_f64().unwrap() - 8.89).abs() < 1e-9);
    assert_eq!(abc["currency"], "INR");
    assert_eq!(abc["company_name"], "ABC");
    assert_eq!(abc["volume"].as_u64(), Some(1200));

    let mno = &json[1];
    assert_eq!(mno["pct_from_high"].as_f64(), Some(0.0));
    assert_eq!(mno["pct_from_low"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_second_request_served_from_cache() {
    let h = harness();

    get_json(&h.app, "/api/stocks").await;
    let after_first = h.provider.calls.load(Ordering::SeqCst);
    assert_eq!(after_first, 4);

    get_json(&h.app, "/api/stocks").await;
    get_json(&h.app, "/api/categories/market-cap/large-cap").await;
    assert_eq!(h.provider.calls.load(Ordering::SeqCst), after_first);
}

#[tokio::test]
async fn test_single_stock_lookup() {
    let h = harness();

    let (status, json) = get_json(&h.app, "/api/stocks/xyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["symbol"], "XYZ");
    assert_eq!(json["pct_from_high"].as_f64(), Some(-50.0));
    assert_eq!(json["pct_from_low"].as_f64(), Some(100.0));

    let (status, json) = get_json(&h.app, "/api/stocks/BROKEN").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["symbol"], "BROKEN");
    assert!(json["error"].as_str().unwrap().contains("connection reset"));

    let (status, json) = get_json(&h.app, "/api/stocks/NOPE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["symbol"], "NOPE");
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_category_endpoints() {
    let h = harness();

    let (status, json) = get_json(&h.app, "/api/category-types").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["market-cap", "business"]);

    let (_, json) = get_json(&h.app, "/api/categories/market-cap").await;
    assert_eq!(json["large-cap"], serde_json::json!(["ABC", "XYZ"]));

    let (_, json) = get_json(&h.app, "/api/categories/business").await;
    assert_eq!(json["abc-group"], serde_json::json!(["ABC", "MNO"]));

    let (status, json) = get_json(&h.app, "/api/categories/business/abc-group").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(symbols(&json), vec!["ABC", "MNO"]);

    // 멤버가 모두 실패하면 빈 목록
    let (status, json) = get_json(&h.app, "/api/categories/market-cap/small-cap").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_category_is_404_without_fetching() {
    let h = harness();

    let (status, json) = get_json(&h.app, "/api/categories/market-cap/mega-cap").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "CATEGORY_NOT_FOUND");

    let (status, _) = get_json(&h.app, "/api/categories/sector/banks").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(h.provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_manual_refresh_and_status() {
    let h = harness();

    let (status, json) = get_json(&h.app, "/api/cache/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["fresh"], false);
    assert_eq!(json["entries"], 0);

    let (status, body) = send(&h.app, "POST", "/api/cache/refresh").await;
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["requested"], 4);
    assert_eq!(report["succeeded"], 3);
    assert_eq!(report["batches"], 2);
    assert_eq!(report["pauses"], 1);
    assert_eq!(report["failed"][0]["symbol"], "BROKEN");

    let (_, json) = get_json(&h.app, "/api/cache/status").await;
    assert_eq!(json["fresh"], true);
    assert_eq!(json["entries"], 3);
    assert_eq!(json["refresh_count"], 1);
}

#[tokio::test]
async fn test_dashboard_index_served() {
    let h = harness();

    let (status, body) = send(&h.app, "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("52-Week Dash"));

    let (status, _) = send(&h.app, "GET", "/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
