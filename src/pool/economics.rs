use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::record::PoolRecord;
use crate::common::errors::{OptionsError, Result};
use crate::common::rounding::{round_half_up, CURRENCY_PLACES};
use crate::pricing::SECONDS_PER_YEAR;

const DAYS_PER_YEAR: Decimal = dec!(365);
const PERCENT: Decimal = dec!(100);

/// Annual percentage yield
///
/// `Unbounded` marks rewards flowing into a pool with no value, where the
/// yield is undefined rather than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Apy {
    Percent(Decimal),
    Unbounded,
}

impl Apy {
    pub fn percent(self) -> Option<Decimal> {
        match self {
            Apy::Percent(p) => Some(p),
            Apy::Unbounded => None,
        }
    }
}

impl std::fmt::Display for Apy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Apy::Percent(p) => write!(f, "{}%", p),
            Apy::Unbounded => write!(f, "∞%"),
        }
    }
}

/// Fraction of the pool owned by an LP balance, in `[0, 1]`
///
/// An empty pool has no meaningful ownership and reports 0.
pub fn ownership_share(user_lp_balance: Decimal, lp_token_supply: Decimal) -> Decimal {
    if lp_token_supply <= Decimal::ZERO || user_lp_balance <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    user_lp_balance
        .checked_div(lp_token_supply)
        .unwrap_or(Decimal::ZERO)
        .min(Decimal::ONE)
}

/// `daily × price × 365 / pool value × 100`
pub fn implied_apy(
    daily_reward_rate: Decimal,
    reward_token_price_usd: Decimal,
    pool_value_usd: Decimal,
) -> Result<Apy> {
    non_negative("daily reward rate", daily_reward_rate)?;
    non_negative("reward token price", reward_token_price_usd)?;
    non_negative("pool value", pool_value_usd)?;

    if daily_reward_rate.is_zero() {
        return Ok(Apy::Percent(Decimal::ZERO));
    }
    if pool_value_usd.is_zero() {
        return Ok(Apy::Unbounded);
    }

    let yearly = daily_reward_rate
        .checked_mul(reward_token_price_usd)
        .and_then(|v| v.checked_mul(DAYS_PER_YEAR))
        .ok_or_else(|| OptionsError::AmountOverflow("yearly reward value".to_string()))?;
    percent_of(yearly, pool_value_usd)
}

/// Staking yield from a per-second reward emission
///
/// `rate × price / staked value × seconds per year × 100`
pub fn staking_apy(
    reward_rate_per_second: Decimal,
    reward_token_price_usd: Decimal,
    staked_value_usd: Decimal,
) -> Result<Apy> {
    non_negative("reward rate", reward_rate_per_second)?;
    non_negative("reward token price", reward_token_price_usd)?;
    non_negative("staked value", staked_value_usd)?;

    if reward_rate_per_second.is_zero() {
        return Ok(Apy::Percent(Decimal::ZERO));
    }
    if staked_value_usd.is_zero() {
        return Ok(Apy::Unbounded);
    }

    let yearly = reward_rate_per_second
        .checked_mul(reward_token_price_usd)
        .and_then(|v| v.checked_mul(Decimal::from(SECONDS_PER_YEAR)))
        .ok_or_else(|| OptionsError::AmountOverflow("yearly staking rewards".to_string()))?;
    percent_of(yearly, staked_value_usd)
}

/// Collateral returned for burning `lp_token_amount` at the current pool value,
/// before any slippage on token sales
pub fn pro_rata_withdraw_estimate(
    lp_token_amount: Decimal,
    total_pool_value: Decimal,
    lp_token_supply: Decimal,
) -> Result<Decimal> {
    non_negative("LP token amount", lp_token_amount)?;
    non_negative("pool value", total_pool_value)?;

    if lp_token_amount.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if lp_token_supply <= Decimal::ZERO || lp_token_amount > lp_token_supply {
        return Err(OptionsError::InsufficientSupply {
            requested: lp_token_amount.to_string(),
            supply: lp_token_supply.to_string(),
        });
    }

    total_pool_value
        .checked_mul(lp_token_amount)
        .and_then(|v| v.checked_div(lp_token_supply))
        .ok_or_else(|| OptionsError::AmountOverflow("pro-rata withdrawal".to_string()))
}

/// LP tokens minted for a collateral deposit
///
/// An empty pool mints one LP token per unit of collateral.
pub fn lp_tokens_for_deposit(
    collateral_amount: Decimal,
    total_pool_value: Decimal,
    lp_token_supply: Decimal,
) -> Result<Decimal> {
    non_negative("collateral amount", collateral_amount)?;

    if total_pool_value <= Decimal::ZERO || lp_token_supply <= Decimal::ZERO {
        return Ok(collateral_amount);
    }

    lp_token_supply
        .checked_mul(collateral_amount)
        .and_then(|v| v.checked_div(total_pool_value))
        .ok_or_else(|| OptionsError::AmountOverflow("LP token estimate".to_string()))
}

/// Pool value in USD
///
/// Stablecoin collateral is taken at face value; anything else is converted
/// at the pool's exchange rate.
pub fn pool_value_usd(pool: &PoolRecord, stablecoins: &[String]) -> Result<Decimal> {
    if is_stablecoin(&pool.collateral_token.symbol, stablecoins) {
        return Ok(pool.total_pool_value);
    }
    pool.total_pool_value
        .checked_mul(pool.exchange_rate)
        .ok_or_else(|| OptionsError::AmountOverflow(format!("value of pool {}", pool.address)))
}

/// Sum of pool values in USD, to the cent
pub fn total_value_locked<'a>(
    pools: impl IntoIterator<Item = &'a PoolRecord>,
    stablecoins: &[String],
) -> Result<Decimal> {
    let total = pools.into_iter().try_fold(Decimal::ZERO, |acc, pool| {
        acc.checked_add(pool_value_usd(pool, stablecoins)?)
            .ok_or_else(|| OptionsError::AmountOverflow("total value locked".to_string()))
    })?;
    Ok(round_half_up(total, CURRENCY_PLACES))
}

/// Remaining deposit capacity, `None` when the pool enforces no limit
pub fn deposit_headroom(pool: &PoolRecord) -> Option<Decimal> {
    if !pool.enforce_deposit_limit {
        return None;
    }
    Some((pool.deposit_limit - pool.total_pool_value).max(Decimal::ZERO))
}

/// Display name, e.g. `WBTC / USDC Calls (WBTC)` or `WBTC / USDC Puts (USDC)`
pub fn pool_label(pool: &PoolRecord, stablecoins: &[String]) -> String {
    let collateral = &pool.collateral_token.symbol;
    let payment = &pool.payment_token.symbol;
    if is_stablecoin(collateral, stablecoins) {
        format!("{} / {} Puts ({})", payment, collateral, collateral)
    } else {
        format!("{} / {} Calls ({})", collateral, payment, collateral)
    }
}

fn is_stablecoin(symbol: &str, stablecoins: &[String]) -> bool {
    stablecoins.iter().any(|s| s.eq_ignore_ascii_case(symbol))
}

fn percent_of(value: Decimal, base: Decimal) -> Result<Apy> {
    let percent = value
        .checked_div(base)
        .and_then(|v| v.checked_mul(PERCENT))
        .ok_or_else(|| OptionsError::AmountOverflow(format!("{} over {}", value, base)))?;
    Ok(Apy::Percent(round_half_up(percent, CURRENCY_PLACES)))
}

fn non_negative(label: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(OptionsError::InvalidInput(format!(
            "{} must not be negative, got {}",
            label, value
        )));
    }
    Ok(())
}
