//! Output precision applied at the boundary of each computation

use rust_decimal::{Decimal, RoundingStrategy};

/// Places kept on option greeks
pub const GREEK_PLACES: u32 = 5;

/// Places kept on currency-facing values (break-even, APY, TVL)
pub const CURRENCY_PLACES: u32 = 2;

/// Places kept on token-denominated display values (premium, open interest)
pub const TOKEN_PLACES: u32 = 4;

/// Round half away from zero
pub fn round_half_up(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}
