//! Subgraph wire types and their conversion into validated records
//!
//! Fields are kept loose here (decimals as raw JSON numbers, amounts as
//! strings) so one bad record fails its own conversion instead of the whole
//! response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::errors::{OptionsError, Result};
use crate::common::types::{SupplyToken, TokenDescriptor};
use crate::market::{MarketRecord, TokenBalance, TokenKind};
use crate::normalize::{parse_raw, Decimals};
use crate::pool::PoolListing;

/// GraphQL POST body
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: serde_json::Value,
}

/// GraphQL response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketsData {
    pub markets: Vec<MarketEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolsData {
    pub amms: Vec<PoolEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancesData {
    pub account_balances: Vec<BalanceEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntityRef {
    pub id: String,
}

/// ERC-20 token as indexed
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenEntry {
    pub id: String,
    pub decimals: serde_json::Number,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

/// bToken, wToken or LP token with its supply
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyTokenEntry {
    pub id: String,
    pub decimals: serde_json::Number,
    /// Big integer as a base-10 string
    pub total_supply: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketEntry {
    pub id: String,
    #[serde(default)]
    pub market_style: Option<String>,
    pub amm: Option<EntityRef>,
    pub collateral_token: TokenEntry,
    pub payment_token: TokenEntry,
    pub market_name: String,
    /// Unix seconds as a string
    pub expiration_date: String,
    pub b_token: SupplyTokenEntry,
    pub w_token: SupplyTokenEntry,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolEntry {
    pub id: String,
    pub collateral_token: TokenEntry,
    pub payment_token: TokenEntry,
    pub lp_token: SupplyTokenEntry,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BalanceEntry {
    pub amount: String,
    pub token: BalanceTokenEntry,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BalanceTokenEntry {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub decimals: serde_json::Number,
    pub market: Option<EntityRef>,
}

impl TryFrom<TokenEntry> for TokenDescriptor {
    type Error = OptionsError;

    fn try_from(entry: TokenEntry) -> Result<Self> {
        let decimals = Decimals::from_json(&entry.decimals)?;
        Ok(TokenDescriptor::new(entry.id, entry.symbol, entry.name, decimals))
    }
}

impl TryFrom<SupplyTokenEntry> for SupplyToken {
    type Error = OptionsError;

    fn try_from(entry: SupplyTokenEntry) -> Result<Self> {
        Ok(SupplyToken {
            decimals: Decimals::from_json(&entry.decimals)?,
            total_supply: parse_raw(&entry.total_supply)?,
            address: entry.id,
        })
    }
}

impl TryFrom<MarketEntry> for MarketRecord {
    type Error = OptionsError;

    fn try_from(entry: MarketEntry) -> Result<Self> {
        let amm_address = entry
            .amm
            .map(|amm| amm.id)
            .ok_or_else(|| OptionsError::InvalidInput(format!("market {} has no AMM", entry.id)))?;

        Ok(MarketRecord {
            expiration: parse_expiration(&entry.expiration_date)?,
            amm_address,
            market_name: entry.market_name,
            collateral_token: entry.collateral_token.try_into()?,
            payment_token: entry.payment_token.try_into()?,
            b_token: entry.b_token.try_into()?,
            w_token: entry.w_token.try_into()?,
            id: entry.id,
        })
    }
}

impl TryFrom<PoolEntry> for PoolListing {
    type Error = OptionsError;

    fn try_from(entry: PoolEntry) -> Result<Self> {
        Ok(PoolListing {
            address: entry.id,
            collateral_token: entry.collateral_token.try_into()?,
            payment_token: entry.payment_token.try_into()?,
            lp_token: entry.lp_token.try_into()?,
        })
    }
}

impl TryFrom<BalanceEntry> for TokenBalance {
    type Error = OptionsError;

    fn try_from(entry: BalanceEntry) -> Result<Self> {
        TokenBalance::new(
            entry.token.market.map(|m| m.id),
            TokenKind::from_indexer(entry.token.kind.as_deref(), &entry.token.name),
            Decimals::from_json(&entry.token.decimals)?,
            parse_raw(&entry.amount)?,
        )
    }
}

/// Unix seconds, as the indexer reports `expirationDate`
pub fn parse_expiration(raw: &str) -> Result<DateTime<Utc>> {
    let seconds: i64 = raw
        .trim()
        .parse()
        .map_err(|e| OptionsError::InvalidInput(format!("expiration {:?}: {}", raw, e)))?;
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| OptionsError::InvalidInput(format!("expiration {} out of range", seconds)))
}
