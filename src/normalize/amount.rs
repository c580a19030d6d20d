use alloy_primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::common::errors::{OptionsError, Result};

/// Largest scale the decimal type can carry
pub const MAX_DECIMALS: u32 = 28;

/// A token's declared decimal precision
///
/// Validated once at ingestion so the conversion functions cannot be handed a
/// negative, fractional or unrepresentable precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Decimals(u32);

impl Decimals {
    pub fn new(value: u32) -> Result<Self> {
        if value > MAX_DECIMALS {
            return Err(OptionsError::InvalidDecimals(format!(
                "{} exceeds the supported maximum of {}",
                value, MAX_DECIMALS
            )));
        }
        Ok(Self(value))
    }

    pub fn from_signed(value: i64) -> Result<Self> {
        if value < 0 {
            return Err(OptionsError::InvalidDecimals(format!(
                "{} is negative",
                value
            )));
        }
        let value = u32::try_from(value)
            .map_err(|_| OptionsError::InvalidDecimals(format!("{} is out of range", value)))?;
        Self::new(value)
    }

    /// Validate a decimals field exactly as it arrived in a JSON payload
    pub fn from_json(value: &serde_json::Number) -> Result<Self> {
        if let Some(v) = value.as_i64() {
            return Self::from_signed(v);
        }
        if let Some(v) = value.as_u64() {
            let v = u32::try_from(v)
                .map_err(|_| OptionsError::InvalidDecimals(format!("{} is out of range", v)))?;
            return Self::new(v);
        }
        Err(OptionsError::InvalidDecimals(format!(
            "{} is not an integer",
            value
        )))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Decimals {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = serde_json::Number::deserialize(deserializer)?;
        Decimals::from_json(&number).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Decimals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a big-integer string as returned by the indexer or a contract read
pub fn parse_raw(raw: &str) -> Result<U256> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(OptionsError::InvalidInput("empty raw amount".to_string()));
    }
    trimmed
        .parse::<U256>()
        .map_err(|e| OptionsError::InvalidInput(format!("invalid raw amount {:?}: {}", raw, e)))
}

/// `raw / 10^decimals`, exact
pub fn to_decimal(raw: U256, decimals: Decimals) -> Result<Decimal> {
    let mantissa = u128::try_from(raw)
        .ok()
        .and_then(|m| i128::try_from(m).ok())
        .ok_or_else(|| {
            OptionsError::AmountOverflow(format!("{} does not fit a decimal mantissa", raw))
        })?;

    Decimal::try_from_i128_with_scale(mantissa, decimals.get())
        .map_err(|e| OptionsError::AmountOverflow(format!("{}: {}", raw, e)))
}

/// `amount × 10^decimals`, truncating anything below the smallest unit
pub fn to_raw(amount: Decimal, decimals: Decimals) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(OptionsError::NegativeAmount(amount.to_string()));
    }

    let truncated = amount.round_dp_with_strategy(decimals.get(), RoundingStrategy::ToZero);
    let mantissa = truncated.mantissa().unsigned_abs();

    Ok(U256::from(mantissa) * pow10(decimals.get() - truncated.scale()))
}

/// Multiply by `10^exponent` for a signed exponent
pub fn shift(value: Decimal, exponent: i32) -> Result<Decimal> {
    let magnitude = exponent.unsigned_abs();
    if magnitude > MAX_DECIMALS {
        return Err(OptionsError::InvalidInput(format!(
            "shift of 10^{} exceeds decimal precision",
            exponent
        )));
    }

    let factor = Decimal::from_i128_with_scale(10i128.pow(magnitude), 0);
    let shifted = if exponent >= 0 {
        value.checked_mul(factor)
    } else {
        value.checked_div(factor)
    };

    shifted.ok_or_else(|| {
        OptionsError::AmountOverflow(format!("{} shifted by 10^{}", value, exponent))
    })
}

/// Shift a raw integer by a signed power of ten
pub fn shift_raw(raw: U256, exponent: i32) -> Result<Decimal> {
    let integer = to_decimal(raw, Decimals(0))?;
    shift(integer, exponent)
}

/// Serialize a raw amount as a base-10 string, the form contracts accept
pub fn serialize_raw<S>(raw: &U256, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(raw)
}

fn pow10(exponent: u32) -> U256 {
    (0..exponent).fold(U256::from(1u8), |acc, _| acc * U256::from(10u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn d(value: u32) -> Decimals {
        Decimals::new(value).unwrap()
    }

    #[test]
    fn test_to_decimal_eighteen_decimals() {
        let raw = parse_raw("1234567890123456789").unwrap();
        assert_eq!(to_decimal(raw, d(18)).unwrap(), dec!(1.234567890123456789));
    }

    #[test]
    fn test_to_decimal_zero_decimals() {
        assert_eq!(to_decimal(U256::from(42u64), d(0)).unwrap(), dec!(42));
    }

    #[test]
    fn test_to_raw_truncates_dust() {
        let raw = to_raw(dec!(1.23456789), d(6)).unwrap();
        assert_eq!(raw, U256::from(1_234_567u64));
    }

    #[test]
    fn test_to_raw_pads_short_scale() {
        let raw = to_raw(dec!(2.5), d(8)).unwrap();
        assert_eq!(raw, U256::from(250_000_000u64));
    }

    #[test]
    fn test_round_trip() {
        for (raw, decimals) in [
            ("0", 18),
            ("1", 18),
            ("65000000000", 6),
            ("999999999999999999999999", 18),
            ("123", 0),
        ] {
            let raw = parse_raw(raw).unwrap();
            let decimal = to_decimal(raw, d(decimals)).unwrap();
            assert_eq!(to_raw(decimal, d(decimals)).unwrap(), raw);
        }
    }

    #[test]
    fn test_to_raw_rejects_negative() {
        let err = to_raw(dec!(-1), d(6)).unwrap_err();
        assert!(matches!(err, OptionsError::NegativeAmount(_)));
    }

    #[test]
    fn test_to_decimal_overflow() {
        let raw = U256::from(1u8) << 200usize;
        let err = to_decimal(raw, d(18)).unwrap_err();
        assert!(matches!(err, OptionsError::AmountOverflow(_)));
    }

    #[test]
    fn test_invalid_decimals() {
        assert!(matches!(
            Decimals::from_signed(-1),
            Err(OptionsError::InvalidDecimals(_))
        ));
        assert!(matches!(
            Decimals::new(29),
            Err(OptionsError::InvalidDecimals(_))
        ));

        let fractional: serde_json::Number = serde_json::from_str("6.5").unwrap();
        assert!(matches!(
            Decimals::from_json(&fractional),
            Err(OptionsError::InvalidDecimals(_))
        ));
    }

    #[test]
    fn test_decimals_deserialize() {
        let ok: Decimals = serde_json::from_str("18").unwrap();
        assert_eq!(ok.get(), 18);
        assert!(serde_json::from_str::<Decimals>("-6").is_err());
    }

    #[test]
    fn test_shift_both_directions() {
        assert_eq!(shift(dec!(1.5), 2).unwrap(), dec!(150));
        assert_eq!(shift(dec!(650000000000000000000), -16).unwrap(), dec!(65000));
    }

    #[test]
    fn test_parse_raw_rejects_garbage() {
        assert!(parse_raw("12abc").is_err());
        assert!(parse_raw("").is_err());
    }
}
