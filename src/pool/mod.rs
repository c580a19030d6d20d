//! Pool economics
//!
//! Ownership, yield, deposit and withdrawal estimates for AMM liquidity pools.
//! Empty pools are handled explicitly: ownership is 0, yield is
//! [`Apy::Unbounded`], and deposits mint 1:1.

mod economics;
mod record;
mod rewards;

pub use economics::{
    deposit_headroom, implied_apy, lp_tokens_for_deposit, ownership_share, pool_label,
    pool_value_usd, pro_rata_withdraw_estimate, staking_apy, total_value_locked, Apy,
};
pub use record::{PoolListing, PoolRecord, RawPoolState};
pub use rewards::{PoolRewards, RewardPools};
