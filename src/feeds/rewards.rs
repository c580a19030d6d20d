//! Liquidity mining rewards API

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::common::errors::{OptionsError, Result};
use crate::common::traits::RewardSource;
use crate::pool::RewardPools;

/// Rewards accrued by one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardSummary {
    pub claimed_rewards: Decimal,
    pub claimable_rewards: Decimal,
    pub total_rewards: Decimal,
    #[serde(default)]
    pub claim_message: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
}

/// Client for the rewards API
#[derive(Debug, Clone)]
pub struct RewardsClient {
    client: Client,
    base_url: String,
}

impl RewardsClient {
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

    /// Claimed and claimable rewards for `account`
    #[instrument(skip(self))]
    pub async fn account_rewards(&self, account: &str) -> Result<RewardSummary> {
        let url = format!("{}/", self.base_url);
        debug!("Fetching rewards for {}", account);

        let response = self
            .client
            .get(&url)
            .query(&[("address", account)])
            .send()
            .await?;
        let body = Self::checked_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn checked_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(OptionsError::InvalidResponse(format!(
                "Server returned status {}: {}",
                status, body
            )));
        }
        Ok(body)
    }
}

#[async_trait]
impl RewardSource for RewardsClient {
    /// Resolves the listing shape once, here
    #[instrument(skip(self))]
    async fn reward_pools(&self) -> Result<RewardPools> {
        let url = format!("{}/pools", self.base_url);
        debug!("Fetching reward pools from: {}", url);

        let response = self.client.get(&url).send().await?;
        let body = Self::checked_body(response).await?;
        RewardPools::from_json(&body)
    }
}
