use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::{fetch_json, http_client};
use crate::core::{Conversion, FeedError, FeedProvider, FetchResult};

/// Fiat and crypto rates published as units per 1 USD.
pub struct OpenExchangeRatesProvider {
    base_url: String,
    app_id: String,
    currencies: Vec<String>,
    timeout: Option<Duration>,
}

impl OpenExchangeRatesProvider {
    pub fn new(base_url: &str, app_id: &str, currencies: &[String]) -> Self {
        OpenExchangeRatesProvider {
            base_url: base_url.to_string(),
            app_id: app_id.to_string(),
            currencies: currencies.to_vec(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Deserialize, Debug)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl FeedProvider for OpenExchangeRatesProvider {
    fn name(&self) -> &str {
        "openexchangerates"
    }

    #[instrument(name = "OpenExchangeRatesFetch", skip(self))]
    async fn fetch(&self) -> Result<FetchResult, FeedError> {
        debug!("Requesting latest rates from {}", self.base_url);

        let url = Url::parse_with_params(&self.base_url, &[("app_id", self.app_id.as_str())])
            .map_err(|e| FeedError::Transport(format!("invalid URL {}: {e}", self.base_url)))?;

        let client = http_client(self.timeout)?;
        let data: LatestRatesResponse = fetch_json(client.get(url)).await?;

        let quotes: Vec<(String, f64)> = self
            .currencies
            .iter()
            .filter_map(|code| data.rates.get(code).map(|rate| (code.clone(), *rate)))
            .collect();

        debug!(
            received = data.rates.len(),
            kept = quotes.len(),
            "Filtered rates to supported currencies"
        );
        Ok(FetchResult::new(quotes, Conversion::Direct))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::default_currencies;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/latest.json"))
            .and(query_param("app_id", "test-key"))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider(server: &MockServer) -> OpenExchangeRatesProvider {
        OpenExchangeRatesProvider::new(
            &format!("{}/api/latest.json", server.uri()),
            "test-key",
            &default_currencies(),
        )
    }

    #[tokio::test]
    async fn test_successful_rates_fetch_filters_unsupported() {
        let mock_server =
            create_mock_server(200, r#"{"rates":{"USD":1.0,"BRL":5.0,"XYZ":9.9}}"#).await;

        let result = provider(&mock_server).fetch().await.unwrap();
        assert_eq!(result.conversion, Conversion::Direct);
        assert_eq!(
            result.quotes,
            vec![("USD".to_string(), 1.0), ("BRL".to_string(), 5.0)]
        );
    }

    #[tokio::test]
    async fn test_extra_fields_are_ignored() {
        let mock_response = r#"{
            "disclaimer": "Usage subject to terms",
            "timestamp": 1700000000,
            "base": "USD",
            "rates": {"EUR": 0.92, "BTC": 0.000027, "GBP": 0.79}
        }"#;
        let mock_server = create_mock_server(200, mock_response).await;

        let result = provider(&mock_server).fetch().await.unwrap();
        assert_eq!(
            result.quotes,
            vec![("EUR".to_string(), 0.92), ("BTC".to_string(), 0.000027)]
        );
    }

    #[tokio::test]
    async fn test_wrong_key_does_not_match() {
        let mock_server = create_mock_server(200, r#"{"rates":{"USD":1.0}}"#).await;
        let provider = OpenExchangeRatesProvider::new(
            &format!("{}/api/latest.json", mock_server.uri()),
            "other-key",
            &default_currencies(),
        );

        // wiremock answers unmatched requests with 404
        let result = provider.fetch().await;
        assert!(matches!(result, Err(FeedError::Transport(_))));
    }

    #[tokio::test]
    async fn test_malformed_payload_yields_no_quotes() {
        // The first codes are well formed but the body is truncated
        let mock_server = create_mock_server(200, r#"{"rates":{"USD":1.0,"BRL":5.0,"EUR""#).await;

        let result = provider(&mock_server).fetch().await;
        assert!(matches!(result, Err(FeedError::Decode(_))));
    }

    #[tokio::test]
    async fn test_missing_rates_field_is_decode_error() {
        let mock_server = create_mock_server(200, r#"{"error": true, "status": 401}"#).await;

        let result = provider(&mock_server).fetch().await;
        assert!(matches!(result, Err(FeedError::Decode(_))));
    }

    #[tokio::test]
    async fn test_invalid_base_url() {
        let provider = OpenExchangeRatesProvider::new("not a url", "key", &default_currencies());
        let result = provider.fetch().await;
        assert!(matches!(result, Err(FeedError::Transport(msg)) if msg.contains("invalid URL")));
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = create_mock_server(500, "").await;

        let result = provider(&mock_server).fetch().await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "transport error: HTTP error: 500 Internal Server Error"
        );
    }
}
