//! warframe.market API client
//!
//! Fetches closed-trade statistics for individual items.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};
use wfm_core::{FetchError, FetchResult, StatFetcher, StatisticPoint};

use crate::types::StatisticsResponse;

/// Base URL for the warframe.market v1 API
pub const WFM_API_BASE: &str = "https://api.warframe.market/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// warframe.market API client
#[derive(Clone)]
pub struct MarketClient {
    client: Client,
    base_url: String,
}

impl MarketClient {
    /// Create a client for the public API
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_config(WFM_API_BASE, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client against a custom base URL (no trailing slash)
    pub fn with_config(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the 90-day closed statistics of an item
    #[instrument(skip(self))]
    pub async fn get_item_statistics(&self, item_name: &str) -> FetchResult<Vec<StatisticPoint>> {
        let url = format!("{}/items/{}/statistics", self.base_url, item_name);

        debug!("Fetching statistics from: {}", url);

        // warframe.market redirects requests that don't ask for JSON
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| FetchError::unavailable(format!("Failed to fetch {}: {}", item_name, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::not_found(item_name));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::unavailable(format!(
                "warframe.market API error ({}): {}",
                status, body
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::unavailable(format!("Failed to read {}: {}", item_name, e)))?;

        let statistics: StatisticsResponse = serde_json::from_slice(&body).map_err(|e| {
            FetchError::malformed(format!("Failed to parse statistics for {}: {}", item_name, e))
        })?;

        let points = statistics.into_points();
        debug!("Received {} statistic points for {}", points.len(), item_name);

        Ok(points)
    }
}

#[async_trait]
impl StatFetcher for MarketClient {
    async fn fetch(&self, item_name: &str) -> FetchResult<Vec<StatisticPoint>> {
        self.get_item_statistics(item_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> MarketClient {
        MarketClient::with_config(server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn statistics_body() -> serde_json::Value {
        json!({
            "payload": {
                "statistics_closed": {
                    "48hours": [],
                    "90days": [
                        {
                            "datetime": "2024-11-02T00:00:00.000+00:00",
                            "volume": 10,
                            "min_price": 90,
                            "max_price": 110,
                            "avg_price": 100.0,
                            "median": 100,
                            "mod_rank": 0,
                            "id": "6725a0b5"
                        },
                        {
                            "datetime": "2024-11-01T00:00:00.000+00:00",
                            "volume": 5,
                            "avg_price": 90.0,
                            "mod_rank": 3
                        },
                        {
                            "datetime": "2024-10-31T00:00:00.000+00:00",
                            "volume": 2,
                            "avg_price": 80.5
                        }
                    ]
                },
                "statistics_live": {}
            }
        })
    }

    #[tokio::test]
    async fn test_get_item_statistics() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items/gilded_truth/statistics"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(statistics_body()))
            .expect(1)
            .mount(&server)
            .await;

        let points = client_for(&server).fetch("gilded_truth").await.unwrap();

        assert_eq!(
            points,
            vec![
                StatisticPoint::new(10, 100.0).with_mod_rank(0),
                StatisticPoint::new(5, 90.0).with_mod_rank(3),
                StatisticPoint::new(2, 80.5),
            ]
        );
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items/no_such_item/statistics"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": {"url_name": "not found"}})))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("no_such_item").await.unwrap_err();
        assert_eq!(err, FetchError::NotFound("no_such_item".to_string()));
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("telos_boltor").await.unwrap_err();
        match err {
            FetchError::Unavailable(msg) => assert!(msg.contains("503"), "unexpected message: {}", msg),
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"payload": {"statistics_closed": {}}})))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("telos_boltor").await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>redirect</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("telos_boltor").await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_connection_failure_is_unavailable() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let client = MarketClient::with_config(uri, Duration::from_secs(2)).unwrap();
        let err = client.fetch("telos_boltor").await.unwrap_err();
        assert!(matches!(err, FetchError::Unavailable(_)), "got {:?}", err);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = MarketClient::with_config("http://localhost:8080/v1/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
    }
}
