use alloy_primitives::U256;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::common::errors::Result;
use crate::common::types::{SupplyToken, TokenDescriptor};
use crate::normalize::{self, Decimals};
use crate::pricing::scale_exchange_rate;

/// A liquidity pool as listed by the indexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolListing {
    /// AMM contract address
    pub address: String,
    pub collateral_token: TokenDescriptor,
    pub payment_token: TokenDescriptor,
    pub lp_token: SupplyToken,
}

/// Pool contract reads, in smallest units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPoolState {
    /// `getTotalPoolValue(true)`, collateral units
    pub total_pool_value: U256,
    /// `getCurrentCollateralPrice()`, wad
    pub collateral_price: U256,
    /// `globalDepositLimit()`, collateral units
    pub deposit_limit: U256,
    pub enforce_deposit_limit: bool,
}

/// A pool with every amount in human units
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolRecord {
    pub address: String,
    pub collateral_token: TokenDescriptor,
    pub payment_token: TokenDescriptor,
    pub lp_token_address: String,
    pub lp_token_decimals: Decimals,
    pub lp_token_supply: Decimal,
    pub user_lp_balance: Decimal,
    /// Collateral units
    pub total_pool_value: Decimal,
    /// Payment tokens per collateral token
    pub exchange_rate: Decimal,
    /// Reward tokens emitted per day to this pool
    pub daily_reward_rate: Decimal,
    /// Collateral units
    pub deposit_limit: Decimal,
    pub enforce_deposit_limit: bool,
}

impl PoolRecord {
    pub fn from_parts(
        listing: &PoolListing,
        state: &RawPoolState,
        user_lp_balance: U256,
        daily_reward_rate: Decimal,
    ) -> Result<Self> {
        let collateral_decimals = listing.collateral_token.decimals;
        Ok(Self {
            address: listing.address.clone(),
            collateral_token: listing.collateral_token.clone(),
            payment_token: listing.payment_token.clone(),
            lp_token_address: listing.lp_token.address.clone(),
            lp_token_decimals: listing.lp_token.decimals,
            lp_token_supply: listing.lp_token.supply()?,
            user_lp_balance: normalize::to_decimal(user_lp_balance, listing.lp_token.decimals)?,
            total_pool_value: normalize::to_decimal(state.total_pool_value, collateral_decimals)?,
            exchange_rate: scale_exchange_rate(
                state.collateral_price,
                collateral_decimals,
                listing.payment_token.decimals,
            )?,
            daily_reward_rate,
            deposit_limit: normalize::to_decimal(state.deposit_limit, collateral_decimals)?,
            enforce_deposit_limit: state.enforce_deposit_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::parse_raw;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_parts_scales_everything() {
        let d = |v| Decimals::new(v).unwrap();
        let listing = PoolListing {
            address: "0xpool".to_string(),
            collateral_token: TokenDescriptor::new("0xwbtc", "WBTC", "Wrapped BTC", d(8)),
            payment_token: TokenDescriptor::new("0xusdc", "USDC", "USD Coin", d(6)),
            lp_token: SupplyToken {
                address: "0xlp".to_string(),
                decimals: d(8),
                total_supply: parse_raw("1000000000").unwrap(),
            },
        };
        let state = RawPoolState {
            total_pool_value: parse_raw("250000000").unwrap(),
            collateral_price: parse_raw("650000000000000000000").unwrap(),
            deposit_limit: parse_raw("5000000000").unwrap(),
            enforce_deposit_limit: true,
        };

        let pool = PoolRecord::from_parts(&listing, &state, U256::from(100_000_000u64), dec!(12))
            .unwrap();
        assert_eq!(pool.lp_token_supply, dec!(10));
        assert_eq!(pool.user_lp_balance, dec!(1));
        assert_eq!(pool.total_pool_value, dec!(2.5));
        assert_eq!(pool.exchange_rate, dec!(65000));
        assert_eq!(pool.deposit_limit, dec!(50));
        assert_eq!(pool.daily_reward_rate, dec!(12));
    }
}
