//! Pricing and greeks
//!
//! Derives spot, break-even and Black-Scholes sensitivities from AMM state
//! that has already been scaled into human units by [`AmmSnapshot::from_raw`].

mod amm;
mod greeks;
mod valuation;

pub use amm::{
    annualize_volatility, scale_exchange_rate, scale_premium, AmmSnapshot, RawAmmState,
    SECONDS_PER_YEAR, VOLATILITY_CALIBRATION, WAD_EXPONENT,
};
pub use greeks::{compute_greeks, Greeks};
pub use valuation::{annualized_roi, compute_break_even, derive_spot, years_to_expiration};
