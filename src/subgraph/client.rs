//! GraphQL client for the protocol subgraph

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

use super::messages::*;
use super::queries::{ACCOUNT_BALANCES_QUERY, LIQUIDITY_POOLS_QUERY, MARKETS_QUERY};
use crate::common::errors::{OptionsError, Result};
use crate::common::traits::MarketIndex;

/// Client for the market/pool/balance subgraph
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    /// HTTP client
    client: Client,
    /// GraphQL endpoint
    url: String,
}

impl SubgraphClient {
    pub fn new(url: &str) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(30))
    }

    /// Create a new client with custom timeout
    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OptionsError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
        })
    }

    /// POST a query and unwrap the GraphQL envelope
    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let request = GraphQlRequest { query, variables };
        let response = self.client.post(&self.url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OptionsError::InvalidResponse(format!(
                "Server returned status {}: {}",
                status, body
            )));
        }

        let envelope: GraphQlResponse<T> = response.json().await?;
        if !envelope.errors.is_empty() {
            let messages: Vec<&str> = envelope.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(OptionsError::InvalidResponse(format!(
                "GraphQL errors: {}",
                messages.join("; ")
            )));
        }

        envelope
            .data
            .ok_or_else(|| OptionsError::InvalidResponse("GraphQL response without data".to_string()))
    }
}

#[async_trait]
impl MarketIndex for SubgraphClient {
    #[instrument(skip(self))]
    async fn markets(&self) -> Result<Vec<MarketEntry>> {
        debug!("Fetching markets from: {}", self.url);
        let data: MarketsData = self.query(MARKETS_QUERY, json!({})).await?;
        debug!("Received {} markets", data.markets.len());
        Ok(data.markets)
    }

    #[instrument(skip(self))]
    async fn liquidity_pools(&self) -> Result<Vec<PoolEntry>> {
        debug!("Fetching liquidity pools from: {}", self.url);
        let data: PoolsData = self.query(LIQUIDITY_POOLS_QUERY, json!({})).await?;
        Ok(data.amms)
    }

    /// Accounts are indexed by lowercase address
    #[instrument(skip(self))]
    async fn account_balances(&self, account: &str) -> Result<Vec<BalanceEntry>> {
        let account = account.to_lowercase();
        debug!("Fetching balances for {}", account);
        let data: BalancesData = self
            .query(ACCOUNT_BALANCES_QUERY, json!({ "id": account }))
            .await?;
        Ok(data.account_balances)
    }
}
