use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::{fetch_json, http_client};
use crate::core::{Conversion, ETH_SYMBOL, FeedError, FeedProvider, FetchResult, invert_price};

/// Ether ticker. Upstream quotes USD per 1 ETH, so the price is inverted before it is
/// handed to the store.
pub struct CoinMarketCapProvider {
    base_url: String,
    timeout: Option<Duration>,
}

impl CoinMarketCapProvider {
    pub fn new(base_url: &str) -> Self {
        CoinMarketCapProvider {
            base_url: base_url.to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Deserialize, Debug)]
struct TickerEntry {
    price_usd: String,
}

#[async_trait]
impl FeedProvider for CoinMarketCapProvider {
    fn name(&self) -> &str {
        "coinmarketcap"
    }

    #[instrument(name = "CoinMarketCapFetch", skip(self))]
    async fn fetch(&self) -> Result<FetchResult, FeedError> {
        debug!("Requesting ticker from {}", self.base_url);

        let client = http_client(self.timeout)?;
        let tickers: Vec<TickerEntry> = fetch_json(client.get(&self.base_url)).await?;

        let ticker = tickers
            .first()
            .ok_or_else(|| FeedError::Data("empty ticker array".to_string()))?;

        let usd_per_eth: f64 = ticker.price_usd.trim().parse().map_err(|_| {
            FeedError::Data(format!("price_usd is not a number: '{}'", ticker.price_usd))
        })?;
        if !usd_per_eth.is_finite() {
            return Err(FeedError::Data(format!(
                "price_usd is not finite: '{}'",
                ticker.price_usd
            )));
        }

        let eth_per_usd = invert_price(usd_per_eth)?;
        debug!(usd_per_eth, eth_per_usd, "Inverted ether price");

        Ok(FetchResult::new(
            vec![(ETH_SYMBOL.to_string(), eth_per_usd)],
            Conversion::Inverted,
        ))
    }
}
