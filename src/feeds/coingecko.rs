//! CoinGecko price feed

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::common::errors::{OptionsError, Result};
use crate::common::traits::PriceFeed;

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Deserialize)]
struct CoinResponse {
    market_data: MarketData,
}

#[derive(Debug, Deserialize)]
struct MarketData {
    current_price: HashMap<String, Decimal>,
}

/// Price feed backed by the CoinGecko `/coins/{id}` endpoint
#[derive(Debug, Clone)]
pub struct CoinGeckoPriceFeed {
    client: Client,
    base_url: String,
}

impl CoinGeckoPriceFeed {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OptionsError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PriceFeed for CoinGeckoPriceFeed {
    #[instrument(skip(self))]
    async fn usd_price(&self, token_id: &str) -> Result<Decimal> {
        let url = format!("{}/coins/{}", self.base_url, token_id);
        debug!("Fetching price from: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OptionsError::InvalidResponse(format!(
                "Server returned status {}: {}",
                status, body
            )));
        }

        let coin: CoinResponse = response.json().await?;
        coin.market_data
            .current_price
            .get("usd")
            .copied()
            .ok_or_else(|| OptionsError::InvalidResponse(format!("No USD price for {}", token_id)))
    }
}
