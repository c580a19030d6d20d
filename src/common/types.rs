//! Value types shared by every engine

use alloy_primitives::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::errors::Result;
use crate::normalize::{self, Decimals};

/// Option type encoded in the fourth market name component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Decode the `C` / `P` market name flag (case-insensitive)
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag.trim().to_ascii_uppercase().as_str() {
            "C" => Some(OptionType::Call),
            "P" => Some(OptionType::Put),
            _ => None,
        }
    }

    pub fn is_call(self) -> bool {
        matches!(self, OptionType::Call)
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// Exercise style of a market
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStyle {
    American,
    European,
    /// Anything the indexer reports that we do not recognise
    Other(String),
}

impl MarketStyle {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "AMERICAN" | "AMERICAN_STYLE" => MarketStyle::American,
            "EUROPEAN" | "EUROPEAN_STYLE" => MarketStyle::European,
            other => MarketStyle::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for MarketStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketStyle::American => write!(f, "American"),
            MarketStyle::European => write!(f, "European"),
            MarketStyle::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Market lifecycle derived from wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Tradeable: `now < expiration`
    Open,
    /// Awaiting settlement inside the grace window
    Expired,
    /// Past the grace window
    Closed,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Open => write!(f, "open"),
            LifecycleState::Expired => write!(f, "expired"),
            LifecycleState::Closed => write!(f, "closed"),
        }
    }
}

/// Which way value flows for the party submitting a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    /// The user pays (buying, depositing); the bound is a maximum
    Outgoing,
    /// The user receives (selling, withdrawing); the bound is a minimum
    Incoming,
}

/// ERC-20 token metadata as reported by the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    /// Contract address; identity of the token
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: Decimals,
}

impl TokenDescriptor {
    pub fn new(
        address: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        decimals: Decimals,
    ) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            name: name.into(),
            decimals,
        }
    }

    /// Tokens are identified by address only
    pub fn same_token(&self, other: &TokenDescriptor) -> bool {
        self.address.eq_ignore_ascii_case(&other.address)
    }
}

/// A token whose circulating supply matters to us (bToken, wToken, LP token)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyToken {
    pub address: String,
    pub decimals: Decimals,
    /// Total supply in the token's smallest unit
    pub total_supply: U256,
}

impl SupplyToken {
    /// Total supply in human units
    pub fn supply(&self) -> Result<Decimal> {
        normalize::to_decimal(self.total_supply, self.decimals)
    }
}
