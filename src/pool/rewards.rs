use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::common::errors::{OptionsError, Result};

/// Per-pool reward entry served by the rewards API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRewards {
    pub si_daily_rewards: Decimal,
}

/// Reward pool listing, resolved once when the rewards response is decoded
///
/// The API has served two shapes: an older flat list of AMM addresses that
/// split a weekly emission evenly, and a map of AMM address to per-pool daily
/// rewards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RewardPools {
    Legacy(Vec<String>),
    PerPool(HashMap<String, PoolRewards>),
}

impl Default for RewardPools {
    fn default() -> Self {
        RewardPools::PerPool(HashMap::new())
    }
}

impl RewardPools {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(OptionsError::from)
    }

    /// Daily reward emission for one pool
    ///
    /// Legacy listings divide `weekly_rate` evenly over the listed pools;
    /// unlisted pools earn nothing in either shape.
    pub fn daily_rewards(&self, pool_address: &str, weekly_rate: Decimal) -> Decimal {
        match self {
            RewardPools::Legacy(pools) => {
                let listed = pools.iter().any(|p| p.eq_ignore_ascii_case(pool_address));
                if !listed {
                    return Decimal::ZERO;
                }
                weekly_rate
                    .checked_div(Decimal::from(7))
                    .and_then(|daily| daily.checked_div(Decimal::from(pools.len())))
                    .unwrap_or(Decimal::ZERO)
            }
            RewardPools::PerPool(pools) => pools
                .iter()
                .find(|(address, _)| address.eq_ignore_ascii_case(pool_address))
                .map(|(_, rewards)| rewards.si_daily_rewards)
                .unwrap_or(Decimal::ZERO),
        }
    }

    /// Resolve daily rates for every listed pool
    pub fn into_daily_rates(self, weekly_rate: Decimal) -> HashMap<String, Decimal> {
        match &self {
            RewardPools::Legacy(pools) => pools
                .iter()
                .map(|p| (p.to_lowercase(), self.daily_rewards(p, weekly_rate)))
                .collect(),
            RewardPools::PerPool(pools) => pools
                .iter()
                .map(|(address, rewards)| (address.to_lowercase(), rewards.si_daily_rewards))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_legacy_list_splits_weekly_rate() {
        let pools = RewardPools::from_json(r#"["0xaaa", "0xbbb"]"#).unwrap();
        assert!(matches!(pools, RewardPools::Legacy(_)));
        assert_eq!(pools.daily_rewards("0xAAA", dec!(1400)), dec!(100));
        assert_eq!(pools.daily_rewards("0xccc", dec!(1400)), Decimal::ZERO);
    }

    #[test]
    fn test_per_pool_map() {
        let pools = RewardPools::from_json(
            r#"{"0xaaa": {"siDailyRewards": 250.5}, "0xbbb": {"siDailyRewards": 10}}"#,
        )
        .unwrap();
        assert_eq!(pools.daily_rewards("0xaaa", dec!(1400)), dec!(250.5));
        assert_eq!(pools.daily_rewards("0xddd", dec!(1400)), Decimal::ZERO);

        let rates = pools.into_daily_rates(Decimal::ZERO);
        assert_eq!(rates.get("0xbbb"), Some(&dec!(10)));
    }

    #[test]
    fn test_empty_legacy_list() {
        let pools = RewardPools::from_json("[]").unwrap();
        assert_eq!(pools.daily_rewards("0xaaa", dec!(1400)), Decimal::ZERO);
    }

    #[test]
    fn test_unrecognised_shape_is_an_error() {
        assert!(RewardPools::from_json(r#""pools""#).is_err());
    }
}
