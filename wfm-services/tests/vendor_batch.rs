//! End-to-end batch over a mock warframe.market
//!
//! Run with: cargo test -p wfm-services --test vendor_batch

use std::fs;
use std::time::Duration;

use serde_json::json;
use wfm_core::{FetchError, ItemError};
use wfm_services::{Scraper, ScraperConfig, ScraperError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn statistics(days: &[(u64, f64, u32)]) -> serde_json::Value {
    let days: Vec<_> = days
        .iter()
        .map(|(volume, avg_price, mod_rank)| {
            json!({"volume": volume, "avg_price": avg_price, "mod_rank": mod_rank})
        })
        .collect();
    json!({"payload": {"statistics_closed": {"90days": days}}})
}

async fn mount(server: &MockServer, item: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/items/{}/statistics", item)))
        .and(header("accept", "application/json"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_vendor_with_missing_item() {
    let server = MockServer::start().await;
    mount(
        &server,
        "gilded_truth",
        ResponseTemplate::new(200).set_body_json(statistics(&[(10, 100.0, 0), (7, 300.0, 5), (5, 90.0, 0)])),
    )
    .await;
    mount(&server, "retired_mod", ResponseTemplate::new(404)).await;
    mount(
        &server,
        "telos_boltor",
        ResponseTemplate::new(200).set_body_json(statistics(&[(1, 200.0, 0), (3, 100.0, 0)])),
    )
    .await;

    let vendor_dir = tempfile::tempdir().unwrap();
    fs::write(
        vendor_dir.path().join("hexis.json"),
        r#"{"name": "Arbiters of Hexis", "items": [
            {"name": "gilded_truth", "type": 0, "standing": 25000},
            {"name": "retired_mod", "type": 0, "standing": 25000},
            {"name": "telos_boltor", "type": 2, "standing": 125000}
        ]}"#,
    )
    .unwrap();

    let config = ScraperConfig {
        api_base: server.uri(),
        rate_limit: Duration::from_millis(20),
        http_timeout: Duration::from_secs(5),
        vendor_dir: Some(vendor_dir.path().to_path_buf()),
    };
    let mut scraper = Scraper::from_config(&config).unwrap();
    assert_eq!(scraper.load_vendors().unwrap(), 1);

    let mut run = scraper.update_vendor_stats("Arbiters of Hexis").unwrap();
    let mut outcomes = Vec::new();
    while let Some(outcome) = run.recv().await {
        outcomes.push(outcome);
    }

    assert_eq!(outcomes.len(), 3);
    let failures: Vec<_> = outcomes.iter().filter(|o| !o.is_success()).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].item_name, "retired_mod");
    assert_eq!(
        failures[0].result,
        Err(ItemError::Fetch(FetchError::NotFound("retired_mod".to_string())))
    );

    let hexis = scraper.vendor("Arbiters of Hexis").unwrap();
    assert!(hexis.item("retired_mod").unwrap().market().is_empty());

    let gilded = hexis.item("gilded_truth").unwrap().market();
    assert!((gilded.weighted_avg_price - 1450.0 / 15.0).abs() < 1e-9);
    assert_eq!(gilded.avg_volume, 7.5);

    let boltor = hexis.item("telos_boltor").unwrap().market();
    assert_eq!(boltor.weighted_avg_price, 125.0);
    assert_eq!(boltor.avg_volume, 2.0);

    let table = hexis.to_string();
    assert!(table.contains("96.67"));
    assert!(table.contains("1000.00"));
}

#[tokio::test]
async fn test_unknown_vendor_name() {
    let mut scraper = Scraper::from_config(&ScraperConfig::default()).unwrap();
    scraper.load_vendors().unwrap();

    let err = scraper.update_vendor_stats("Perrin Sequence").unwrap_err();
    assert!(matches!(err, ScraperError::VendorNotFound(_)));
}
