//! Configuration types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::errors::{OptionsError, Result};
use crate::market::{LifecyclePolicy, DEFAULT_GRACE_PERIOD_DAYS};
use crate::quote::SlippageTolerance;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Indexing service
    #[serde(default)]
    pub subgraph: SubgraphConfig,
    /// Reward token price source
    #[serde(default)]
    pub price_feed: PriceFeedConfig,
    /// Liquidity mining rewards API (optional)
    #[serde(default)]
    pub rewards: Option<RewardsConfig>,
    /// On-chain state source
    #[serde(default)]
    pub chain: ChainConfig,
    /// Parameters of the derivation engines
    #[serde(default)]
    pub trading: TradingConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Subgraph configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgraphConfig {
    /// GraphQL endpoint
    #[serde(default = "default_subgraph_url")]
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for SubgraphConfig {
    fn default() -> Self {
        Self {
            url: default_subgraph_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_subgraph_url() -> String {
    "https://api.thegraph.com/subgraphs/name/sirenmarkets/protocol-rinkeby".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Price feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceFeedConfig {
    /// CoinGecko-compatible API base URL
    #[serde(default = "default_price_feed_url")]
    pub url: String,
    /// Feed identifier of the reward token
    #[serde(default = "default_reward_token_id")]
    pub reward_token_id: String,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            url: default_price_feed_url(),
            reward_token_id: default_reward_token_id(),
        }
    }
}

fn default_price_feed_url() -> String {
    crate::feeds::DEFAULT_COINGECKO_URL.to_string()
}

fn default_reward_token_id() -> String {
    "siren".to_string()
}

/// Rewards API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardsConfig {
    /// Base URL serving `/pools` and `/?address=`
    pub url: String,
}

/// Chain state configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainConfig {
    /// JSON snapshot of contract state keyed by address
    #[serde(default)]
    pub state_file: Option<String>,
}

/// Derivation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Fractional tolerance applied to quoted amounts
    #[serde(default)]
    pub slippage_tolerance: SlippageTolerance,
    /// Days an expired market awaits settlement before it is closed
    #[serde(default = "default_grace_period_days")]
    pub grace_period_days: i64,
    /// Annual risk-free rate used in greeks
    #[serde(default)]
    pub risk_free_rate: Decimal,
    /// Weekly emission split across pools by the legacy rewards listing
    #[serde(default)]
    pub legacy_weekly_reward_rate: Decimal,
    /// Collateral symbols valued at face value in USD
    #[serde(default = "default_stablecoins")]
    pub stablecoins: Vec<String>,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            slippage_tolerance: SlippageTolerance::default(),
            grace_period_days: default_grace_period_days(),
            risk_free_rate: Decimal::ZERO,
            legacy_weekly_reward_rate: Decimal::ZERO,
            stablecoins: default_stablecoins(),
        }
    }
}

impl TradingConfig {
    pub fn lifecycle_policy(&self) -> Result<LifecyclePolicy> {
        LifecyclePolicy::with_grace_days(self.grace_period_days)
            .map_err(|e| OptionsError::Configuration(format!("trading.grace_period_days: {}", e)))
    }
}

fn default_grace_period_days() -> i64 {
    DEFAULT_GRACE_PERIOD_DAYS
}

fn default_stablecoins() -> Vec<String> {
    vec!["USDC".to_string()]
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Delay between refreshes in `--watch` mode
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval() -> u64 {
    60
}
