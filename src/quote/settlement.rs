//! Amounts for exercising, closing and claiming against a held position
//!
//! These move tokens at the market contract rather than through the AMM, so
//! there is no slippage bound; amounts are exact and rounded half-up to the
//! token's smallest unit.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::common::errors::{OptionsError, Result};
use crate::common::rounding::round_half_up;
use crate::common::types::OptionType;
use crate::market::Position;
use crate::normalize::{self, serialize_raw, Decimals};

/// A token amount in both whole and smallest units
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementAmount {
    pub amount: Decimal,
    #[serde(serialize_with = "serialize_raw")]
    pub raw_amount: U256,
}

impl SettlementAmount {
    fn new(amount: Decimal, decimals: Decimals) -> Result<Self> {
        let amount = round_half_up(amount, decimals.get());
        Ok(Self {
            raw_amount: normalize::to_raw(amount, decimals)?,
            amount,
        })
    }
}

/// Both legs of an exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseQuote {
    pub contracts: Decimal,
    /// Paid to the market in payment tokens
    pub payment: SettlementAmount,
    /// bTokens surrendered, in collateral units
    pub exercise: SettlementAmount,
}

/// Exercise `contracts` of the position's bTokens
///
/// The payment is the exercised share of the bToken balance, priced at the
/// strike for calls.
pub fn exercise_quote(position: &Position, contracts: Decimal) -> Result<ExerciseQuote> {
    let option = &position.option;
    let share = share_of(
        contracts,
        position.b_token_contracts,
        position.b_token_balance,
        "bToken",
    )?;
    let payment = match option.option_type {
        OptionType::Call => share.checked_mul(option.strike),
        OptionType::Put => Some(share),
    }
    .ok_or_else(|| OptionsError::AmountOverflow(format!("payment for {} contracts", contracts)))?;
    let exercise = match option.option_type {
        OptionType::Call => Some(contracts),
        OptionType::Put => contracts.checked_mul(option.strike),
    }
    .ok_or_else(|| OptionsError::AmountOverflow(format!("exercise of {} contracts", contracts)))?;

    Ok(ExerciseQuote {
        contracts,
        payment: SettlementAmount::new(payment, option.payment_token.decimals)?,
        exercise: SettlementAmount::new(exercise, option.collateral_token.decimals)?,
    })
}

/// Collateral released by burning matched bToken and wToken pairs
pub fn close_position_amount(position: &Position, contracts: Decimal) -> Result<SettlementAmount> {
    let closable_contracts = position.b_token_contracts.min(position.w_token_contracts);
    let closable_balance = position.b_token_balance.min(position.w_token_balance);
    let amount = share_of(contracts, closable_contracts, closable_balance, "matched pair")?;
    SettlementAmount::new(amount, position.option.collateral_token.decimals)
}

/// The whole wToken balance, claimed as collateral
pub fn claim_collateral_amount(position: &Position) -> Result<SettlementAmount> {
    if position.w_token_balance <= Decimal::ZERO {
        return Err(OptionsError::InvalidInput(format!(
            "no wTokens to claim in market {}",
            position.option.market_id
        )));
    }
    SettlementAmount::new(position.w_token_balance, position.option.collateral_token.decimals)
}

/// `balance × contracts / held`, for `0 < contracts <= held`
fn share_of(contracts: Decimal, held: Decimal, balance: Decimal, what: &str) -> Result<Decimal> {
    if contracts <= Decimal::ZERO {
        return Err(OptionsError::InvalidInput(format!(
            "contracts must be positive, got {}",
            contracts
        )));
    }
    if held <= Decimal::ZERO || contracts > held {
        return Err(OptionsError::InvalidInput(format!(
            "{} contracts requested, {} {} contracts held",
            contracts, held, what
        )));
    }
    balance
        .checked_mul(contracts)
        .and_then(|scaled| scaled.checked_div(held))
        .ok_or_else(|| OptionsError::AmountOverflow(format!("{} of {} {}", contracts, held, what)))
}
