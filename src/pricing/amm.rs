use alloy_primitives::U256;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::common::errors::{OptionsError, Result};
use crate::common::rounding::{round_half_up, TOKEN_PLACES};
use crate::common::types::OptionType;
use crate::normalize::{self, Decimals};

/// AMM contracts report prices as 18-decimal fixed point
pub const WAD_EXPONENT: i32 = -18;

/// Seconds in a 365-day year
pub const SECONDS_PER_YEAR: i64 = 365 * 24 * 60 * 60;

/// Divisor the AMM's per-second volatility factor is calibrated against
pub const VOLATILITY_CALIBRATION: Decimal = dec!(0.4);

/// Contract reads for one market, as returned by the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAmmState {
    /// `getPriceForMarket(market)`: bToken price in collateral, wad
    pub price_for_market: U256,
    /// `getCurrentCollateralPrice()`: payment per collateral, wad, unscaled for token decimals
    pub collateral_price: U256,
    /// `volatilityFactor()`
    pub volatility_factor: U256,
}

/// AMM state in human units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmSnapshot {
    /// Option premium in token units
    pub premium: Decimal,
    /// Payment tokens per collateral token
    pub exchange_rate: Decimal,
    pub annualized_volatility: Decimal,
}

impl AmmSnapshot {
    pub fn from_raw(
        raw: &RawAmmState,
        option_type: OptionType,
        strike: Decimal,
        collateral_decimals: Decimals,
        payment_decimals: Decimals,
    ) -> Result<Self> {
        let exchange_rate =
            scale_exchange_rate(raw.collateral_price, collateral_decimals, payment_decimals)?;
        Ok(Self {
            premium: scale_premium(raw.price_for_market, option_type, strike, exchange_rate)?,
            exchange_rate,
            annualized_volatility: annualize_volatility(raw.volatility_factor)?,
        })
    }
}

/// `raw × 10^(collateral − payment − 18)`
pub fn scale_exchange_rate(
    raw: U256,
    collateral_decimals: Decimals,
    payment_decimals: Decimals,
) -> Result<Decimal> {
    let exponent =
        collateral_decimals.get() as i32 - payment_decimals.get() as i32 + WAD_EXPONENT;
    normalize::shift_raw(raw, exponent)
}

/// Per-second volatility factor to an annualized volatility
pub fn annualize_volatility(raw_factor: U256) -> Result<Decimal> {
    let factor = normalize::shift_raw(raw_factor, WAD_EXPONENT)?;
    let sqrt_year = Decimal::from(SECONDS_PER_YEAR)
        .sqrt()
        .ok_or_else(|| OptionsError::InvalidInput("square root of a year".to_string()))?;

    factor
        .checked_mul(sqrt_year)
        .and_then(|v| v.checked_div(VOLATILITY_CALIBRATION))
        .ok_or_else(|| OptionsError::AmountOverflow(format!("volatility factor {}", raw_factor)))
}

/// Premium per contract
///
/// Call prices are already per unit of collateral. Put prices are per unit of
/// collateral posted at the strike, so they are scaled by strike and rate.
pub fn scale_premium(
    raw_price: U256,
    option_type: OptionType,
    strike: Decimal,
    exchange_rate: Decimal,
) -> Result<Decimal> {
    let price = normalize::shift_raw(raw_price, WAD_EXPONENT)?;
    let premium = match option_type {
        OptionType::Call => Some(price),
        OptionType::Put => price
            .checked_mul(strike)
            .and_then(|v| v.checked_mul(exchange_rate)),
    }
    .ok_or_else(|| OptionsError::AmountOverflow(format!("premium {}", raw_price)))?;

    Ok(round_half_up(premium, TOKEN_PLACES))
}
