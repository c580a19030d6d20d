//! Chain reader backed by a JSON snapshot of contract state
//!
//! The snapshot is keyed by contract address and holds the same raw integer
//! strings a contract read returns:
//!
//! ```json
//! {
//!   "amms": {
//!     "0xamm": {
//!       "collateral_price": "650000000000000000000",
//!       "volatility_factor": "42737384317069",
//!       "market_prices": { "0xmarket": "50000000000000000" }
//!     }
//!   },
//!   "pools": {
//!     "0xamm": {
//!       "total_pool_value": "250000000",
//!       "deposit_limit": "5000000000",
//!       "enforce_deposit_limit": true
//!     }
//!   },
//!   "lp_balances": { "0xlp": { "0xaccount": "100000000" } }
//! }
//! ```

use alloy_primitives::U256;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::common::errors::{OptionsError, Result};
use crate::common::traits::ChainReader;
use crate::normalize::parse_raw;
use crate::pool::RawPoolState;
use crate::pricing::RawAmmState;

#[derive(Debug, Clone, Default, Deserialize)]
struct ChainStateFile {
    #[serde(default)]
    amms: HashMap<String, AmmEntry>,
    #[serde(default)]
    pools: HashMap<String, PoolEntry>,
    #[serde(default)]
    lp_balances: HashMap<String, HashMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
struct AmmEntry {
    collateral_price: String,
    volatility_factor: String,
    #[serde(default)]
    market_prices: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
struct PoolEntry {
    total_pool_value: String,
    /// Falls back to the AMM entry's price when absent
    #[serde(default)]
    collateral_price: Option<String>,
    #[serde(default)]
    deposit_limit: Option<String>,
    #[serde(default = "default_enforce_deposit_limit")]
    enforce_deposit_limit: bool,
}

fn default_enforce_deposit_limit() -> bool {
    true
}

/// [`ChainReader`] over a JSON state snapshot
#[derive(Debug, Clone, Default)]
pub struct StateFileReader {
    state: ChainStateFile,
}

impl StateFileReader {
    /// Read and parse a snapshot file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let body = tokio::fs::read_to_string(path).await?;
        let reader = Self::from_json(&body)?;
        info!(
            "Loaded chain state from {}: {} AMMs, {} pools",
            path.display(),
            reader.state.amms.len(),
            reader.state.pools.len()
        );
        Ok(reader)
    }

    /// Parse a snapshot; addresses are matched case-insensitively
    pub fn from_json(body: &str) -> Result<Self> {
        let raw: ChainStateFile = serde_json::from_str(body)?;
        let state = ChainStateFile {
            amms: raw
                .amms
                .into_iter()
                .map(|(address, mut entry)| {
                    entry.market_prices = lowercase_keys(entry.market_prices);
                    (address.to_lowercase(), entry)
                })
                .collect(),
            pools: lowercase_keys(raw.pools),
            lp_balances: raw
                .lp_balances
                .into_iter()
                .map(|(token, holders)| (token.to_lowercase(), lowercase_keys(holders)))
                .collect(),
        };
        Ok(Self { state })
    }

    fn amm(&self, amm_address: &str) -> Result<&AmmEntry> {
        self.state
            .amms
            .get(&amm_address.to_lowercase())
            .ok_or_else(|| OptionsError::InvalidResponse(format!("No state for AMM {}", amm_address)))
    }
}

#[async_trait]
impl ChainReader for StateFileReader {
    async fn amm_state(&self, amm_address: &str, market_id: &str) -> Result<RawAmmState> {
        let amm = self.amm(amm_address)?;
        let price = amm.market_prices.get(&market_id.to_lowercase()).ok_or_else(|| {
            OptionsError::InvalidResponse(format!("No price for market {} on {}", market_id, amm_address))
        })?;

        Ok(RawAmmState {
            price_for_market: parse_raw(price)?,
            collateral_price: parse_raw(&amm.collateral_price)?,
            volatility_factor: parse_raw(&amm.volatility_factor)?,
        })
    }

    async fn pool_state(&self, amm_address: &str) -> Result<RawPoolState> {
        let pool = self
            .state
            .pools
            .get(&amm_address.to_lowercase())
            .ok_or_else(|| OptionsError::InvalidResponse(format!("No state for pool {}", amm_address)))?;

        let collateral_price = match &pool.collateral_price {
            Some(price) => parse_raw(price)?,
            None => parse_raw(&self.amm(amm_address)?.collateral_price)?,
        };

        Ok(RawPoolState {
            total_pool_value: parse_raw(&pool.total_pool_value)?,
            collateral_price,
            deposit_limit: match &pool.deposit_limit {
                Some(limit) => parse_raw(limit)?,
                None => U256::ZERO,
            },
            enforce_deposit_limit: pool.enforce_deposit_limit,
        })
    }

    /// Holders missing from the snapshot hold nothing
    async fn lp_balance(&self, lp_token_address: &str, account: &str) -> Result<U256> {
        let balance = self
            .state
            .lp_balances
            .get(&lp_token_address.to_lowercase())
            .and_then(|holders| holders.get(&account.to_lowercase()));

        match balance {
            Some(raw) => parse_raw(raw),
            None => {
                debug!("No LP balance for {} on {}", account, lp_token_address);
                Ok(U256::ZERO)
            }
        }
    }
}

fn lowercase_keys<V>(map: HashMap<String, V>) -> HashMap<String, V> {
    map.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect()
}
