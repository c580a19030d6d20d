//! Feeds module - chain state, price and reward collaborators

pub mod coingecko;
pub mod fanout;
pub mod rewards;
pub mod state_file;

pub use coingecko::{CoinGeckoPriceFeed, DEFAULT_COINGECKO_URL};
pub use fanout::{fetch_amm_states, fetch_pool_states, PoolChainState};
pub use rewards::{RewardSummary, RewardsClient};
pub use state_file::StateFileReader;
