//! Batch derivation over indexer and chain data
//!
//! Each refresh builds a new set of views from scratch. A record that fails
//! to convert or derive is skipped and logged; it never takes the batch down
//! with it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::common::errors::{OptionsError, Result};
use crate::common::traits::{ChainReader, MarketIndex, PriceFeed, RewardSource};
use crate::config::TradingConfig;
use crate::feeds::{fetch_amm_states, fetch_pool_states, PoolChainState};
use crate::market::{positions_from_balances, DerivedOption, LifecyclePolicy, MarketRecord, Position, TokenBalance};
use crate::pool::{
    deposit_headroom, implied_apy, ownership_share, pool_label, pool_value_usd,
    pro_rata_withdraw_estimate, total_value_locked, Apy, PoolListing, PoolRecord, RewardPools,
};
use crate::pricing::{
    annualized_roi, compute_break_even, compute_greeks, derive_spot, years_to_expiration,
    AmmSnapshot, Greeks, RawAmmState,
};
use crate::subgraph::messages::{BalanceEntry, MarketEntry, PoolEntry};

/// A record left out of a batch and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub id: String,
    pub reason: String,
}

/// Derived items plus whatever could not be derived
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch<T> {
    pub items: Vec<T>,
    pub skipped: Vec<SkippedRecord>,
}

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> Batch<T> {
    fn push(&mut self, id: &str, result: Result<T>) {
        match result {
            Ok(item) => self.items.push(item),
            Err(e) => {
                warn!(id, error = %e, "Skipping record");
                self.skipped.push(SkippedRecord {
                    id: id.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Carry forward records skipped at an earlier stage
    fn with_skipped(mut self, mut earlier: Vec<SkippedRecord>) -> Self {
        earlier.append(&mut self.skipped);
        self.skipped = earlier;
        self
    }
}

/// AMM-derived figures for one market
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketPricing {
    #[serde(flatten)]
    pub amm: AmmSnapshot,
    pub spot: Decimal,
    pub break_even: Decimal,
    /// `None` inside the last day
    pub annualized_roi: Option<Decimal>,
    /// `None` at or past expiration
    pub greeks: Option<Greeks>,
}

/// A market as displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketView {
    #[serde(flatten)]
    pub option: DerivedOption,
    /// `None` while AMM state is pending
    pub pricing: Option<MarketPricing>,
}

/// A pool as displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolView {
    #[serde(flatten)]
    pub pool: PoolRecord,
    pub label: String,
    pub value_usd: Decimal,
    pub ownership_share: Decimal,
    /// Collateral the viewing account would receive for its whole LP balance
    pub withdraw_estimate: Decimal,
    /// `None` when the reward token price is unknown
    pub apy: Option<Apy>,
    pub deposit_headroom: Option<Decimal>,
}

/// Pools plus their combined value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolSnapshot {
    pub total_value_locked: Decimal,
    #[serde(flatten)]
    pub pools: Batch<PoolView>,
}

/// Convert indexer markets into validated records
pub fn ingest_markets(entries: Vec<MarketEntry>) -> Batch<MarketRecord> {
    let mut batch = Batch::default();
    for entry in entries {
        let id = entry.id.clone();
        batch.push(&id, MarketRecord::try_from(entry));
    }
    batch
}

/// Convert indexer pools into validated listings
pub fn ingest_pools(entries: Vec<PoolEntry>) -> Batch<PoolListing> {
    let mut batch = Batch::default();
    for entry in entries {
        let id = entry.id.clone();
        batch.push(&id, PoolListing::try_from(entry));
    }
    batch
}

/// Convert indexer balances; records are identified by token name
pub fn ingest_balances(entries: Vec<BalanceEntry>) -> Batch<TokenBalance> {
    let mut batch = Batch::default();
    for entry in entries {
        let id = entry.token.name.clone();
        batch.push(&id, TokenBalance::try_from(entry));
    }
    batch
}

/// Classify every record
pub fn derive_options(
    records: &[MarketRecord],
    now: DateTime<Utc>,
    policy: &LifecyclePolicy,
) -> Batch<DerivedOption> {
    let mut batch = Batch::default();
    for record in records {
        batch.push(&record.id, DerivedOption::from_record(record, now, policy));
    }
    batch
}

/// Price every option with AMM state available
///
/// Options without AMM state are kept with no pricing; options whose state
/// cannot be derived are skipped.
pub fn build_market_views(
    options: Vec<DerivedOption>,
    amm_states: &HashMap<String, RawAmmState>,
    now: DateTime<Utc>,
    trading: &TradingConfig,
) -> Batch<MarketView> {
    let mut batch = Batch::default();
    for option in options {
        let view = match amm_states.get(&option.market_id) {
            Some(raw) => price_option(&option, raw, now, trading.risk_free_rate).map(|pricing| {
                MarketView {
                    option: option.clone(),
                    pricing: Some(pricing),
                }
            }),
            None => Ok(MarketView {
                option: option.clone(),
                pricing: None,
            }),
        };
        batch.push(&option.market_id, view);
    }
    batch
}

/// Derive AMM figures, spot, break-even and greeks for one option
pub fn price_option(
    option: &DerivedOption,
    raw: &RawAmmState,
    now: DateTime<Utc>,
    risk_free_rate: Decimal,
) -> Result<MarketPricing> {
    let amm = AmmSnapshot::from_raw(
        raw,
        option.option_type,
        option.strike,
        option.collateral_token.decimals,
        option.payment_token.decimals,
    )?;
    let spot = derive_spot(option.option_type, amm.exchange_rate)?;
    let greeks = compute_greeks(
        option.option_type,
        spot,
        option.strike,
        years_to_expiration(option.expiration, now),
        amm.annualized_volatility,
        risk_free_rate,
    )?;

    Ok(MarketPricing {
        break_even: compute_break_even(option.option_type, amm.premium, spot, option.strike)?,
        annualized_roi: annualized_roi(amm.premium, option.expiration, now),
        greeks,
        spot,
        amm,
    })
}

/// Combine listings with chain state and rewards
pub fn build_pool_views(
    listings: &[PoolListing],
    chain_states: &HashMap<String, PoolChainState>,
    reward_pools: &RewardPools,
    reward_token_price: Option<Decimal>,
    trading: &TradingConfig,
) -> Result<PoolSnapshot> {
    let mut batch = Batch::default();
    for listing in listings {
        let view = match chain_states.get(&listing.address) {
            Some(chain) => pool_view(listing, chain, reward_pools, reward_token_price, trading),
            None => Err(OptionsError::InvalidResponse("pool state unavailable".to_string())),
        };
        batch.push(&listing.address, view);
    }

    let total_value_locked = total_value_locked(batch.items.iter().map(|v| &v.pool), &trading.stablecoins)?;
    Ok(PoolSnapshot {
        total_value_locked,
        pools: batch,
    })
}

fn pool_view(
    listing: &PoolListing,
    chain: &PoolChainState,
    reward_pools: &RewardPools,
    reward_token_price: Option<Decimal>,
    trading: &TradingConfig,
) -> Result<PoolView> {
    let daily_rewards = reward_pools.daily_rewards(&listing.address, trading.legacy_weekly_reward_rate);
    let pool = PoolRecord::from_parts(listing, &chain.state, chain.user_lp_balance, daily_rewards)?;
    let value_usd = pool_value_usd(&pool, &trading.stablecoins)?;
    let apy = match reward_token_price {
        Some(price) => Some(implied_apy(pool.daily_reward_rate, price, value_usd)?),
        None => None,
    };

    Ok(PoolView {
        label: pool_label(&pool, &trading.stablecoins),
        ownership_share: ownership_share(pool.user_lp_balance, pool.lp_token_supply),
        withdraw_estimate: pro_rata_withdraw_estimate(
            withdrawable_lp(&pool),
            pool.total_pool_value,
            pool.lp_token_supply,
        )?,
        deposit_headroom: deposit_headroom(&pool),
        value_usd,
        apy,
        pool,
    })
}

/// LP balance capped at the indexed supply
///
/// The balance is read from chain while the supply comes from the indexer, so
/// a lagging supply can sit below a fresh balance.
fn withdrawable_lp(pool: &PoolRecord) -> Decimal {
    if pool.user_lp_balance > pool.lp_token_supply {
        warn!(
            pool = %pool.address,
            balance = %pool.user_lp_balance,
            supply = %pool.lp_token_supply,
            "LP balance exceeds indexed supply"
        );
        return pool.lp_token_supply;
    }
    pool.user_lp_balance
}

/// Fetch and derive every market
pub async fn refresh_markets<I, C>(
    index: &I,
    chain: &C,
    now: DateTime<Utc>,
    trading: &TradingConfig,
) -> Result<Batch<MarketView>>
where
    I: MarketIndex + ?Sized,
    C: ChainReader + ?Sized,
{
    let records = ingest_markets(index.markets().await?);
    let options = derive_options(&records.items, now, &trading.lifecycle_policy()?);
    let amm_states = fetch_amm_states(chain, &options.items).await;

    let skipped = [records.skipped, options.skipped].concat();
    let views = build_market_views(options.items, &amm_states, now, trading).with_skipped(skipped);
    info!(
        "Derived {} markets, skipped {}",
        views.items.len(),
        views.skipped.len()
    );
    Ok(views)
}

/// Fetch and derive every pool, as seen by `account` when given
///
/// Missing rewards listings or reward prices degrade to no rewards and no
/// APY rather than failing the refresh.
pub async fn refresh_pools<I, C>(
    index: &I,
    chain: &C,
    rewards: Option<&dyn RewardSource>,
    prices: &dyn PriceFeed,
    reward_token_id: &str,
    account: Option<&str>,
    trading: &TradingConfig,
) -> Result<PoolSnapshot>
where
    I: MarketIndex + ?Sized,
    C: ChainReader + ?Sized,
{
    let listings = ingest_pools(index.liquidity_pools().await?);
    let chain_states = fetch_pool_states(chain, &listings.items, account).await;

    let reward_pools = match rewards {
        Some(source) => source.reward_pools().await.unwrap_or_else(|e| {
            warn!("Failed to fetch reward pool list: {}", e);
            RewardPools::default()
        }),
        None => RewardPools::default(),
    };
    let reward_token_price = match prices.usd_price(reward_token_id).await {
        Ok(price) => Some(price),
        Err(e) => {
            warn!("Reward token price unavailable: {}", e);
            None
        }
    };

    let mut snapshot = build_pool_views(
        &listings.items,
        &chain_states,
        &reward_pools,
        reward_token_price,
        trading,
    )?;
    snapshot.pools = snapshot.pools.with_skipped(listings.skipped);
    Ok(snapshot)
}

/// Fetch balances for `account` and group them against current markets
pub async fn refresh_positions<I>(
    index: &I,
    account: &str,
    now: DateTime<Utc>,
    trading: &TradingConfig,
) -> Result<Batch<Position>>
where
    I: MarketIndex + ?Sized,
{
    let records = ingest_markets(index.markets().await?);
    let options = derive_options(&records.items, now, &trading.lifecycle_policy()?);
    let balances = ingest_balances(index.account_balances(account).await?);

    let mut positions = Batch::default();
    for (market_id, position) in positions_from_balances(&balances.items, &options.items) {
        positions.push(&market_id, position);
    }
    Ok(positions.with_skipped([records.skipped, options.skipped, balances.skipped].concat()))
}
