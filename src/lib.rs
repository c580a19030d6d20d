//! options_market Library
//!
//! Derives option market and liquidity pool economics from indexed
//! on-chain data: token amount normalization, market classification and
//! lifecycle, Black-Scholes pricing, pool economics and slippage-bounded
//! quotes. The engines are pure functions; the collaborators that feed them
//! live behind the traits in [`common::traits`].

pub mod common;
pub mod config;
pub mod feeds;
pub mod market;
pub mod normalize;
pub mod pool;
pub mod pricing;
pub mod quote;
pub mod snapshot;
pub mod subgraph;

// Re-export commonly used types
pub use common::errors::{OptionsError, Result};
pub use common::types::{
    LifecycleState, MarketStyle, OptionType, SupplyToken, TokenDescriptor, TradeDirection,
};
pub use config::types::AppConfig;
pub use normalize::{to_decimal, to_raw, Decimals};

// Engine entry points
pub use market::{classify, lifecycle_state, DerivedOption, MarketRecord};
pub use pool::{implied_apy, ownership_share, pro_rata_withdraw_estimate, Apy};
pub use pricing::{compute_break_even, compute_greeks, derive_spot, AmmSnapshot, Greeks};
pub use quote::{apply_slippage, build_quote, Quote, SlippageTolerance};
pub use snapshot::{Batch, MarketView, PoolView, SkippedRecord};
