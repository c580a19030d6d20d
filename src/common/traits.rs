//! Trait definitions for external collaborators
//!
//! The derivation engines never perform I/O. Everything they consume comes
//! through one of these seams, so each can be swapped for a fixture or mock.

use alloy_primitives::U256;
use async_trait::async_trait;
use rust_decimal::Decimal;

use super::errors::Result;
use crate::pool::{RawPoolState, RewardPools};
use crate::pricing::RawAmmState;
use crate::subgraph::messages::{BalanceEntry, MarketEntry, PoolEntry};

/// Indexing service holding market, pool and balance records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketIndex: Send + Sync {
    async fn markets(&self) -> Result<Vec<MarketEntry>>;

    async fn liquidity_pools(&self) -> Result<Vec<PoolEntry>>;

    /// Token balances held by `account`
    async fn account_balances(&self, account: &str) -> Result<Vec<BalanceEntry>>;
}

/// Read access to AMM and token contracts
///
/// All values come back in smallest units; scaling happens in the engines.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Price, collateral price and volatility factor of one market's AMM
    async fn amm_state(&self, amm_address: &str, market_id: &str) -> Result<RawAmmState>;

    /// Pool value, collateral price and deposit limits of one AMM
    async fn pool_state(&self, amm_address: &str) -> Result<RawPoolState>;

    /// ERC-20 `balanceOf(account)` on an LP token
    async fn lp_balance(&self, lp_token_address: &str, account: &str) -> Result<U256>;
}

/// Token price in a reference currency
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// USD price of the token with the given feed identifier
    async fn usd_price(&self, token_id: &str) -> Result<Decimal>;
}

/// Liquidity mining reward listings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardSource: Send + Sync {
    async fn reward_pools(&self) -> Result<RewardPools>;
}
