//! Concurrent per-record chain reads
//!
//! One read per market or pool, issued together and merged into a map keyed
//! by market id or pool address. A failed read drops that key only.

use alloy_primitives::U256;
use futures_util::future::join_all;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::common::traits::ChainReader;
use crate::market::DerivedOption;
use crate::pool::{PoolListing, RawPoolState};
use crate::pricing::RawAmmState;

/// Pool contract state plus the viewing account's LP balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolChainState {
    pub state: RawPoolState,
    pub user_lp_balance: U256,
}

/// AMM reads for every market, keyed by market id
pub async fn fetch_amm_states<C>(chain: &C, options: &[DerivedOption]) -> HashMap<String, RawAmmState>
where
    C: ChainReader + ?Sized,
{
    let reads = options.iter().map(|option| async move {
        let result = chain.amm_state(&option.amm_address, &option.market_id).await;
        (option.market_id.clone(), result)
    });

    let mut states = HashMap::new();
    for (market_id, result) in join_all(reads).await {
        match result {
            Ok(state) => {
                states.insert(market_id, state);
            }
            Err(e) => warn!("AMM state unavailable for market {}: {}", market_id, e),
        }
    }
    debug!("Fetched AMM state for {}/{} markets", states.len(), options.len());
    states
}

/// Pool reads for every listing, keyed by pool address
///
/// Without an account, or when the balance read fails, the LP balance is 0.
pub async fn fetch_pool_states<C>(
    chain: &C,
    listings: &[PoolListing],
    account: Option<&str>,
) -> HashMap<String, PoolChainState>
where
    C: ChainReader + ?Sized,
{
    let reads = listings.iter().map(|listing| async move {
        let state = chain.pool_state(&listing.address).await;
        let balance = match account {
            Some(account) => chain
                .lp_balance(&listing.lp_token.address, account)
                .await
                .unwrap_or_else(|e| {
                    warn!("LP balance unavailable for pool {}: {}", listing.address, e);
                    U256::ZERO
                }),
            None => U256::ZERO,
        };
        (listing.address.clone(), state, balance)
    });

    let mut states = HashMap::new();
    for (address, state, user_lp_balance) in join_all(reads).await {
        match state {
            Ok(state) => {
                states.insert(address, PoolChainState { state, user_lp_balance });
            }
            Err(e) => warn!("Pool state unavailable for {}: {}", address, e),
        }
    }
    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::OptionsError;
    use crate::common::traits::MockChainReader;
    use crate::common::types::{LifecycleState, MarketStyle, OptionType, SupplyToken, TokenDescriptor};
    use crate::normalize::Decimals;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn option(market_id: &str) -> DerivedOption {
        let d = Decimals::new(8).unwrap();
        DerivedOption {
            market_id: market_id.to_string(),
            amm_address: "0xamm".to_string(),
            pair_label: "WBTC/USDC".to_string(),
            option_type: OptionType::Call,
            market_style: MarketStyle::American,
            strike: dec!(60000),
            expiration: Utc::now(),
            lifecycle_state: LifecycleState::Open,
            open_interest: Decimal::ZERO,
            collateral_token: TokenDescriptor::new("0xwbtc", "WBTC", "WBTC", d),
            payment_token: TokenDescriptor::new("0xusdc", "USDC", "USDC", d),
            b_token_decimals: d,
            w_token_decimals: d,
        }
    }

    fn raw_state() -> RawAmmState {
        RawAmmState {
            price_for_market: U256::from(1u8),
            collateral_price: U256::from(2u8),
            volatility_factor: U256::from(3u8),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_failed_amm_read_drops_only_that_market() {
        let mut chain = MockChainReader::new();
        chain
            .expect_amm_state()
            .returning(|_, market_id| match market_id {
                "0xbad" => Err(OptionsError::InvalidResponse("reverted".to_string())),
                _ => Ok(raw_state()),
            });

        let options = vec![option("0xgood"), option("0xbad"), option("0xalso")];
        let states = fetch_amm_states(&chain, &options).await;

        assert_eq!(states.len(), 2);
        assert!(states.contains_key("0xgood"));
        assert!(!states.contains_key("0xbad"));
    }

    #[tokio::test]
    async fn test_pool_states_without_account() {
        let mut chain = MockChainReader::new();
        chain.expect_pool_state().returning(|_| {
            Ok(RawPoolState {
                total_pool_value: U256::from(10u8),
                collateral_price: U256::from(1u8),
                deposit_limit: U256::ZERO,
                enforce_deposit_limit: false,
            })
        });
        chain.expect_lp_balance().never();

        let listing = PoolListing {
            address: "0xpool".to_string(),
            collateral_token: TokenDescriptor::new("0xwbtc", "WBTC", "WBTC", Decimals::new(8).unwrap()),
            payment_token: TokenDescriptor::new("0xusdc", "USDC", "USDC", Decimals::new(6).unwrap()),
            lp_token: SupplyToken {
                address: "0xlp".to_string(),
                decimals: Decimals::new(8).unwrap(),
                total_supply: U256::ZERO,
            },
        };
        let states = fetch_pool_states(&chain, &[listing], None).await;
        assert_eq!(states["0xpool"].user_lp_balance, U256::ZERO);
    }
}
