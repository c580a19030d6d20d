use alloy_primitives::U256;
use rust_decimal::Decimal;
use serde::Serialize;

use super::slippage::{apply_slippage, SlippageTolerance};
use crate::common::errors::{OptionsError, Result};
use crate::common::rounding::{round_half_up, TOKEN_PLACES};
use crate::common::types::{OptionType, TradeDirection};
use crate::market::DerivedOption;
use crate::normalize::{self, serialize_raw, Decimals};
use crate::pool::{lp_tokens_for_deposit, pro_rata_withdraw_estimate, PoolRecord};

/// What the user is asking the AMM to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeKind {
    /// Pay collateral for bTokens
    Buy,
    /// Sell bTokens for collateral
    Sell,
    /// Deposit collateral for LP tokens
    Provide,
    /// Burn LP tokens for collateral
    Withdraw,
}

impl TradeKind {
    /// Direction of the bounded leg
    ///
    /// Only buying bounds what the user pays. Every other trade bounds what
    /// the user receives: collateral on a sale or withdrawal, LP tokens on a
    /// deposit.
    pub fn bound_direction(self) -> TradeDirection {
        match self {
            TradeKind::Buy => TradeDirection::Outgoing,
            TradeKind::Sell | TradeKind::Provide | TradeKind::Withdraw => TradeDirection::Incoming,
        }
    }
}

/// Token precision of each quote leg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteUnits {
    pub quantity: Decimals,
    pub amount: Decimals,
}

/// Numbers handed to the transaction submitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub direction: TradeDirection,
    /// Amount traded, in the quantity token's units
    pub quantity: Decimal,
    /// Counter amount as quoted, before slippage
    pub quoted_amount: Decimal,
    /// `quoted_amount` widened by the slippage tolerance
    pub bounded_amount: Decimal,
    #[serde(serialize_with = "serialize_raw")]
    pub raw_quantity: U256,
    #[serde(serialize_with = "serialize_raw")]
    pub raw_bounded_amount: U256,
}

/// Apply slippage to a quoted amount and convert both legs to smallest units
pub fn build_quote(
    base_quantity: Decimal,
    quoted_amount: Decimal,
    tolerance: SlippageTolerance,
    direction: TradeDirection,
    units: QuoteUnits,
) -> Result<Quote> {
    if base_quantity <= Decimal::ZERO {
        return Err(OptionsError::InvalidInput(format!(
            "quote quantity must be positive, got {}",
            base_quantity
        )));
    }

    let bounded_amount = apply_slippage(quoted_amount, tolerance, direction)?;
    Ok(Quote {
        direction,
        quantity: base_quantity,
        quoted_amount,
        bounded_amount,
        raw_quantity: normalize::to_raw(base_quantity, units.quantity)?,
        raw_bounded_amount: normalize::to_raw(bounded_amount, units.amount)?,
    })
}

/// bTokens needed for `contracts` options: one per contract for calls, strike
/// many for puts
pub fn collateral_quantity(
    option_type: OptionType,
    contracts: Decimal,
    strike: Decimal,
) -> Result<Decimal> {
    match option_type {
        OptionType::Call => Ok(contracts),
        OptionType::Put => contracts
            .checked_mul(strike)
            .ok_or_else(|| OptionsError::AmountOverflow(format!("{} contracts at {}", contracts, strike))),
    }
}

/// Maximum collateral for buying `contracts`, given the AMM's collateral-in quote
pub fn buy_quote(
    option: &DerivedOption,
    contracts: Decimal,
    collateral_in: Decimal,
    tolerance: SlippageTolerance,
) -> Result<Quote> {
    option_quote(option, contracts, collateral_in, tolerance, TradeKind::Buy)
}

/// Minimum collateral for selling `contracts`, given the AMM's collateral-out quote
pub fn sell_quote(
    option: &DerivedOption,
    contracts: Decimal,
    collateral_out: Decimal,
    tolerance: SlippageTolerance,
) -> Result<Quote> {
    option_quote(option, contracts, collateral_out, tolerance, TradeKind::Sell)
}

fn option_quote(
    option: &DerivedOption,
    contracts: Decimal,
    collateral: Decimal,
    tolerance: SlippageTolerance,
    kind: TradeKind,
) -> Result<Quote> {
    let quantity = collateral_quantity(option.option_type, contracts, option.strike)?;
    let decimals = option.collateral_token.decimals;
    build_quote(
        quantity,
        collateral,
        tolerance,
        kind.bound_direction(),
        QuoteUnits {
            quantity: decimals,
            amount: decimals,
        },
    )
}

/// Minimum LP tokens for a collateral deposit
pub fn provide_quote(
    pool: &PoolRecord,
    collateral_amount: Decimal,
    tolerance: SlippageTolerance,
) -> Result<Quote> {
    let lp_tokens = lp_tokens_for_deposit(
        collateral_amount,
        pool.total_pool_value,
        pool.lp_token_supply,
    )?;
    build_quote(
        collateral_amount,
        round_half_up(lp_tokens, TOKEN_PLACES),
        tolerance,
        TradeKind::Provide.bound_direction(),
        QuoteUnits {
            quantity: pool.collateral_token.decimals,
            amount: pool.lp_token_decimals,
        },
    )
}

/// Minimum collateral for burning LP tokens
pub fn withdraw_quote(
    pool: &PoolRecord,
    lp_token_amount: Decimal,
    tolerance: SlippageTolerance,
) -> Result<Quote> {
    let collateral = pro_rata_withdraw_estimate(
        lp_token_amount,
        pool.total_pool_value,
        pool.lp_token_supply,
    )?;
    build_quote(
        lp_token_amount,
        collateral,
        tolerance,
        TradeKind::Withdraw.bound_direction(),
        QuoteUnits {
            quantity: pool.lp_token_decimals,
            amount: pool.collateral_token.decimals,
        },
    )
}
