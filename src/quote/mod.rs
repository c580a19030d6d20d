//! Quote construction
//!
//! Turns an AMM quote into the bounded amounts a transaction is submitted
//! with, and sizes exercise, close and claim amounts against a held
//! position. Nothing here submits transactions or tracks allowances.

mod builder;
mod settlement;
mod slippage;

pub use builder::{
    build_quote, buy_quote, collateral_quantity, provide_quote, sell_quote, withdraw_quote,
    Quote, QuoteUnits, TradeKind,
};
pub use settlement::{
    claim_collateral_amount, close_position_amount, exercise_quote, ExerciseQuote, SettlementAmount,
};
pub use slippage::{apply_slippage, SlippageTolerance, DEFAULT_SLIPPAGE_TOLERANCE};
