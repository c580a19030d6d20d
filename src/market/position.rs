use std::collections::HashMap;

use alloy_primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::debug;

use super::option::DerivedOption;
use crate::common::errors::{OptionsError, Result};
use crate::common::types::OptionType;
use crate::normalize::{self, Decimals};

/// Kind of token behind an account balance record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    BToken,
    WToken,
    LpToken,
    Other,
}

impl TokenKind {
    /// Classify from the indexer's token type and name
    pub fn from_indexer(kind: Option<&str>, name: &str) -> Self {
        match kind.map(|k| k.to_ascii_uppercase()) {
            Some(k) if k == "B_TOKEN" => TokenKind::BToken,
            Some(k) if k == "W_TOKEN" => TokenKind::WToken,
            Some(k) if k == "LP_TOKEN" => TokenKind::LpToken,
            _ if name.starts_with("LP") => TokenKind::LpToken,
            _ => TokenKind::Other,
        }
    }
}

/// One account balance as reported by the indexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    pub market_id: Option<String>,
    pub kind: TokenKind,
    pub decimals: Decimals,
    /// Balance in the token's smallest unit
    pub amount: U256,
    /// `amount` in whole tokens
    pub balance: Decimal,
}

impl TokenBalance {
    /// Fails when the raw amount does not fit the decimal range
    pub fn new(market_id: Option<String>, kind: TokenKind, decimals: Decimals, amount: U256) -> Result<Self> {
        Ok(Self {
            balance: normalize::to_decimal(amount, decimals)?,
            market_id,
            kind,
            decimals,
            amount,
        })
    }
}

/// A user's holdings in one market
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    #[serde(flatten)]
    pub option: DerivedOption,
    pub b_token_balance: Decimal,
    pub b_token_contracts: Decimal,
    pub w_token_balance: Decimal,
    pub w_token_contracts: Decimal,
}

impl Position {
    /// Token balances are collateral-denominated; puts are converted to
    /// contracts by dividing through the strike
    pub fn from_balances(
        option: &DerivedOption,
        b_token_balance: Decimal,
        w_token_balance: Decimal,
    ) -> Result<Self> {
        Ok(Self {
            option: option.clone(),
            b_token_balance,
            b_token_contracts: contracts(option, b_token_balance, option.b_token_decimals)?,
            w_token_balance,
            w_token_contracts: contracts(option, w_token_balance, option.w_token_decimals)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.b_token_contracts <= Decimal::ZERO && self.w_token_contracts <= Decimal::ZERO
    }
}

fn contracts(option: &DerivedOption, balance: Decimal, decimals: Decimals) -> Result<Decimal> {
    match option.option_type {
        OptionType::Call => Ok(balance),
        OptionType::Put => balance
            .checked_div(option.strike)
            .map(|c| c.round_dp_with_strategy(decimals.get(), RoundingStrategy::MidpointAwayFromZero))
            .ok_or_else(|| OptionsError::DivisionByZero("contracts over zero strike".to_string())),
    }
}

/// Group balances into per-market positions, in first-seen market order
///
/// Each entry carries its market id so a caller can skip the markets that
/// fail. LP tokens and balances for markets we do not know are ignored, and
/// positions with no contracts on either side are dropped.
pub fn positions_from_balances(
    balances: &[TokenBalance],
    options: &[DerivedOption],
) -> Vec<(String, Result<Position>)> {
    let mut holdings: HashMap<&str, Result<(Decimal, Decimal)>> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for balance in balances {
        let Some(market_id) = balance.market_id.as_deref() else {
            continue;
        };
        if matches!(balance.kind, TokenKind::LpToken | TokenKind::Other) {
            continue;
        }

        let entry = holdings.entry(market_id).or_insert_with(|| {
            order.push(market_id);
            Ok((Decimal::ZERO, Decimal::ZERO))
        });
        let updated = match entry {
            Ok((b_total, w_total)) => add_balance(*b_total, *w_total, balance, market_id),
            Err(_) => continue,
        };
        *entry = updated;
    }

    let mut positions = Vec::with_capacity(order.len());
    for market_id in order {
        let Some(option) = options.iter().find(|o| o.market_id == market_id) else {
            debug!(market_id, "Balance for unknown market ignored");
            continue;
        };
        let position = match holdings.remove(market_id) {
            Some(Ok((b_balance, w_balance))) => Position::from_balances(option, b_balance, w_balance),
            Some(Err(e)) => Err(e),
            None => continue,
        };
        if matches!(&position, Ok(p) if p.is_empty()) {
            continue;
        }
        positions.push((market_id.to_string(), position));
    }

    positions
}

fn add_balance(
    b_total: Decimal,
    w_total: Decimal,
    balance: &TokenBalance,
    market_id: &str,
) -> Result<(Decimal, Decimal)> {
    let overflow = || OptionsError::AmountOverflow(format!("balance total for market {}", market_id));
    match balance.kind {
        TokenKind::BToken => Ok((b_total.checked_add(balance.balance).ok_or_else(overflow)?, w_total)),
        TokenKind::WToken => Ok((b_total, w_total.checked_add(balance.balance).ok_or_else(overflow)?)),
        TokenKind::LpToken | TokenKind::Other => Ok((b_total, w_total)),
    }
}
