//! Market classification and lifecycle
//!
//! Turns indexed market records into [`DerivedOption`]s: the option type and
//! strike decoded from the structured market name, the pair label ordered by
//! the asset delivered on exercise, and the time-driven lifecycle state.
//! Also groups account balances into [`Position`]s.

mod classifier;
mod lifecycle;
mod option;
mod position;

pub use classifier::{classify, decode_strike, pair_label, MarketName, NAME_COMPONENTS};
pub use lifecycle::{lifecycle_state, LifecyclePolicy, DEFAULT_GRACE_PERIOD_DAYS};
pub use option::{open_interest, DerivedOption, MarketRecord};
pub use position::{positions_from_balances, Position, TokenBalance, TokenKind};
