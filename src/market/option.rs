use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::classifier::{classify, pair_label};
use super::lifecycle::LifecyclePolicy;
use crate::common::errors::{OptionsError, Result};
use crate::common::rounding::{round_half_up, TOKEN_PLACES};
use crate::common::types::{
    LifecycleState, MarketStyle, OptionType, SupplyToken, TokenDescriptor,
};
use crate::normalize::{self, Decimals};

/// An option market as reported by the indexer, after field validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRecord {
    /// Market contract address
    pub id: String,
    pub amm_address: String,
    /// Structured name, `{underlying}.{quote}.{style}.{C|P}.{strike}`
    pub market_name: String,
    pub expiration: DateTime<Utc>,
    pub collateral_token: TokenDescriptor,
    pub payment_token: TokenDescriptor,
    pub b_token: SupplyToken,
    pub w_token: SupplyToken,
}

/// Everything the classifier can say about a market without AMM data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedOption {
    pub market_id: String,
    pub amm_address: String,
    pub pair_label: String,
    pub option_type: OptionType,
    pub market_style: MarketStyle,
    pub strike: Decimal,
    pub expiration: DateTime<Utc>,
    pub lifecycle_state: LifecycleState,
    pub open_interest: Decimal,
    pub collateral_token: TokenDescriptor,
    pub payment_token: TokenDescriptor,
    pub b_token_decimals: Decimals,
    pub w_token_decimals: Decimals,
}

impl DerivedOption {
    pub fn from_record(
        record: &MarketRecord,
        now: DateTime<Utc>,
        policy: &LifecyclePolicy,
    ) -> Result<Self> {
        let name = classify(&record.market_name)?;
        let open_interest = open_interest(
            record.b_token.total_supply,
            record.collateral_token.decimals,
            name.option_type,
            name.strike,
        )?;

        Ok(Self {
            market_id: record.id.clone(),
            amm_address: record.amm_address.clone(),
            pair_label: pair_label(
                name.option_type,
                &record.collateral_token.symbol,
                &record.payment_token.symbol,
            ),
            option_type: name.option_type,
            market_style: name.market_style,
            strike: name.strike,
            expiration: record.expiration,
            lifecycle_state: policy.state(record.expiration, now),
            open_interest,
            collateral_token: record.collateral_token.clone(),
            payment_token: record.payment_token.clone(),
            b_token_decimals: record.b_token.decimals,
            w_token_decimals: record.w_token.decimals,
        })
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle_state == LifecycleState::Open
    }
}

/// Outstanding contracts: bToken supply in collateral units, divided by the
/// strike for puts since put collateral is posted in strike terms
pub fn open_interest(
    b_token_supply: U256,
    collateral_decimals: Decimals,
    option_type: OptionType,
    strike: Decimal,
) -> Result<Decimal> {
    let supply = normalize::to_decimal(b_token_supply, collateral_decimals)?;
    let contracts = match option_type {
        OptionType::Call => supply,
        OptionType::Put => supply
            .checked_div(strike)
            .ok_or_else(|| OptionsError::DivisionByZero("open interest over zero strike".to_string()))?,
    };
    Ok(round_half_up(contracts, TOKEN_PLACES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn token(symbol: &str, decimals: u32) -> TokenDescriptor {
        TokenDescriptor::new(
            format!("0x{}", symbol.to_lowercase()),
            symbol,
            symbol,
            Decimals::new(decimals).unwrap(),
        )
    }

    fn record(name: &str, expiration: DateTime<Utc>, b_supply: u64) -> MarketRecord {
        MarketRecord {
            id: "0xmarket".to_string(),
            amm_address: "0xamm".to_string(),
            market_name: name.to_string(),
            expiration,
            collateral_token: token("WBTC", 8),
            payment_token: token("USDC", 6),
            b_token: SupplyToken {
                address: "0xb".to_string(),
                decimals: Decimals::new(8).unwrap(),
                total_supply: U256::from(b_supply),
            },
            w_token: SupplyToken {
                address: "0xw".to_string(),
                decimals: Decimals::new(8).unwrap(),
                total_supply: U256::from(b_supply),
            },
        }
    }

    #[test]
    fn test_derive_call() {
        let now = Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap();
        let expiration = now + Duration::days(30);
        let option = DerivedOption::from_record(
            &record("WBTC.USDC.AMERICAN.C.60000", expiration, 250_000_000),
            now,
            &LifecyclePolicy::default(),
        )
        .unwrap();

        assert_eq!(option.option_type, OptionType::Call);
        assert_eq!(option.strike, dec!(60000));
        assert_eq!(option.pair_label, "WBTC/USDC");
        assert_eq!(option.lifecycle_state, LifecycleState::Open);
        assert_eq!(option.open_interest, dec!(2.5));
        assert!(option.is_open());
    }

    #[test]
    fn test_derive_rejects_malformed_name() {
        let now = Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap();
        let err = DerivedOption::from_record(
            &record("WBTC-USDC-C-60000", now, 0),
            now,
            &LifecyclePolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OptionsError::MalformedMarketName { .. }));
    }

    #[test]
    fn test_put_open_interest_divides_by_strike() {
        let oi = open_interest(
            U256::from(1_000_000_000u64),
            Decimals::new(6).unwrap(),
            OptionType::Put,
            dec!(400),
        )
        .unwrap();
        assert_eq!(oi, dec!(2.5));
    }
}
