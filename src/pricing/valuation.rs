use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::amm::SECONDS_PER_YEAR;
use crate::common::errors::{OptionsError, Result};
use crate::common::rounding::{round_half_up, CURRENCY_PLACES, TOKEN_PLACES};
use crate::common::types::OptionType;

/// Spot price in the option's own quoting direction
///
/// Put markets quote the inverse pair, so the AMM rate is inverted for them.
pub fn derive_spot(option_type: OptionType, amm_exchange_rate: Decimal) -> Result<Decimal> {
    match option_type {
        OptionType::Call => Ok(amm_exchange_rate),
        OptionType::Put => Decimal::ONE.checked_div(amm_exchange_rate).ok_or_else(|| {
            OptionsError::DivisionByZero("put spot from a zero exchange rate".to_string())
        }),
    }
}

/// Underlying price at which the holder recovers the premium
pub fn compute_break_even(
    option_type: OptionType,
    premium: Decimal,
    spot: Decimal,
    strike: Decimal,
) -> Result<Decimal> {
    let premium_value = premium
        .checked_mul(spot)
        .ok_or_else(|| OptionsError::AmountOverflow(format!("premium {} at spot {}", premium, spot)))?;

    let break_even = match option_type {
        OptionType::Call => strike.checked_add(premium_value),
        OptionType::Put => strike.checked_sub(premium_value),
    }
    .ok_or_else(|| OptionsError::AmountOverflow(format!("break-even for strike {}", strike)))?;

    Ok(round_half_up(break_even, CURRENCY_PLACES))
}

/// Fractional years until expiration; negative once expired
pub fn years_to_expiration(expiration: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (expiration - now).num_milliseconds() as f64;
    millis / 1000.0 / SECONDS_PER_YEAR as f64
}

/// Premium annualized over the whole days left to expiration
///
/// `None` once less than a day remains.
pub fn annualized_roi(
    premium: Decimal,
    expiration: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<Decimal> {
    let days = (expiration - now).num_days();
    if days < 1 {
        return None;
    }
    let roi = premium.checked_mul(Decimal::from(365))?.checked_div(Decimal::from(days))?;
    Some(round_half_up(roi, TOKEN_PLACES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    #[test]
    fn test_spot_for_call_and_put() {
        assert_eq!(derive_spot(OptionType::Call, dec!(65000)).unwrap(), dec!(65000));
        assert_eq!(derive_spot(OptionType::Put, dec!(4)).unwrap(), dec!(0.25));
    }

    #[test]
    fn test_put_spot_zero_rate() {
        let err = derive_spot(OptionType::Put, Decimal::ZERO).unwrap_err();
        assert!(matches!(err, OptionsError::DivisionByZero(_)));
    }

    #[test]
    fn test_break_even() {
        assert_eq!(
            compute_break_even(OptionType::Call, dec!(0.05), dec!(65000), dec!(60000)).unwrap(),
            dec!(63250)
        );
        assert_eq!(
            compute_break_even(OptionType::Put, dec!(0.1), dec!(1234.567), dec!(50000)).unwrap(),
            dec!(49876.54)
        );
    }

    #[test]
    fn test_years_are_fractional() {
        let now = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let years = years_to_expiration(now + Duration::days(30), now);
        assert!((years - 0.08219).abs() < 0.0001, "years={}", years);
        assert!(years_to_expiration(now - Duration::days(1), now) < 0.0);
    }

    #[test]
    fn test_annualized_roi() {
        let now = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let roi = annualized_roi(dec!(0.01), now + Duration::days(73), now).unwrap();
        assert_eq!(roi, dec!(0.05));
        assert_eq!(annualized_roi(dec!(0.01), now + Duration::hours(12), now), None);
    }
}
