use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::common::errors::{OptionsError, Result};
use crate::common::rounding::{round_half_up, GREEK_PLACES};
use crate::common::types::OptionType;

/// Option sensitivities, rounded to five places
///
/// Units follow the usual quoting conventions: vega and rho per one
/// percentage point, theta per calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Greeks {
    pub delta: Decimal,
    pub gamma: Decimal,
    pub vega: Decimal,
    pub theta: Decimal,
    pub rho: Decimal,
}

/// Closed-form Black-Scholes greeks
///
/// Returns `Ok(None)` at or past expiration, where the closed form divides by
/// zero and the sensitivities are not meaningful. Non-positive spot, strike or
/// volatility is an error.
pub fn compute_greeks(
    option_type: OptionType,
    spot: Decimal,
    strike: Decimal,
    years_to_expiration: f64,
    volatility: Decimal,
    risk_free_rate: Decimal,
) -> Result<Option<Greeks>> {
    if years_to_expiration.is_nan() {
        return Err(OptionsError::InvalidInput(
            "years to expiration is NaN".to_string(),
        ));
    }
    if years_to_expiration <= 0.0 {
        return Ok(None);
    }

    let s = positive("spot", spot)?;
    let k = positive("strike", strike)?;
    let sigma = positive("volatility", volatility)?;
    let r = to_f64("risk-free rate", risk_free_rate)?;
    let t = years_to_expiration;

    let normal = Normal::standard();
    let sqrt_t = t.sqrt();
    let sigma_sqrt_t = sigma * sqrt_t;
    let d1 = ((s / k).ln() + (r + sigma * sigma / 2.0) * t) / sigma_sqrt_t;
    let d2 = d1 - sigma_sqrt_t;
    let pdf_d1 = normal.pdf(d1);
    let discounted_strike = k * (-r * t).exp();

    let (delta, theta, rho) = match option_type {
        OptionType::Call => (
            normal.cdf(d1),
            (-s * pdf_d1 * sigma / (2.0 * sqrt_t) - r * discounted_strike * normal.cdf(d2)) / 365.0,
            discounted_strike * t * normal.cdf(d2) / 100.0,
        ),
        OptionType::Put => (
            normal.cdf(d1) - 1.0,
            (-s * pdf_d1 * sigma / (2.0 * sqrt_t) + r * discounted_strike * normal.cdf(-d2)) / 365.0,
            -discounted_strike * t * normal.cdf(-d2) / 100.0,
        ),
    };
    let gamma = pdf_d1 / (s * sigma_sqrt_t);
    let vega = s * sqrt_t * pdf_d1 / 100.0;

    Ok(Some(Greeks {
        delta: round_greek("delta", delta)?,
        gamma: round_greek("gamma", gamma)?,
        vega: round_greek("vega", vega)?,
        theta: round_greek("theta", theta)?,
        rho: round_greek("rho", rho)?,
    }))
}

fn to_f64(label: &str, value: Decimal) -> Result<f64> {
    value
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| OptionsError::InvalidInput(format!("{} {} is not representable", label, value)))
}

fn positive(label: &str, value: Decimal) -> Result<f64> {
    if value <= Decimal::ZERO {
        return Err(OptionsError::InvalidInput(format!(
            "{} must be positive, got {}",
            label, value
        )));
    }
    to_f64(label, value)
}

fn round_greek(label: &str, value: f64) -> Result<Decimal> {
    Decimal::from_f64(value)
        .map(|v| round_half_up(v, GREEK_PLACES))
        .ok_or_else(|| OptionsError::InvalidInput(format!("{} evaluated to {}", label, value)))
}
