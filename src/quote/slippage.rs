use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::common::errors::{OptionsError, Result};
use crate::common::types::TradeDirection;

pub const DEFAULT_SLIPPAGE_TOLERANCE: Decimal = dec!(0.05);

/// Fractional slippage tolerance, `0 <= tolerance < 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct SlippageTolerance(Decimal);

impl SlippageTolerance {
    pub fn new(tolerance: Decimal) -> Result<Self> {
        if (tolerance.is_sign_negative() && !tolerance.is_zero()) || tolerance >= Decimal::ONE {
            return Err(OptionsError::InvalidInput(format!(
                "slippage tolerance must be in [0, 1), got {}",
                tolerance
            )));
        }
        Ok(Self(tolerance))
    }

    pub fn get(self) -> Decimal {
        self.0
    }
}

impl Default for SlippageTolerance {
    fn default() -> Self {
        Self(DEFAULT_SLIPPAGE_TOLERANCE)
    }
}

impl TryFrom<Decimal> for SlippageTolerance {
    type Error = OptionsError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SlippageTolerance> for Decimal {
    fn from(value: SlippageTolerance) -> Self {
        value.0
    }
}

/// Widen a quoted amount into the bound a transaction is submitted with
///
/// Outgoing amounts get a ceiling of `amount × (1 + tolerance)`; incoming
/// amounts get a floor of `amount × (1 − tolerance)`.
pub fn apply_slippage(
    amount: Decimal,
    tolerance: SlippageTolerance,
    direction: TradeDirection,
) -> Result<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(OptionsError::InvalidInput(format!(
            "cannot bound a negative amount {}",
            amount
        )));
    }

    let factor = match direction {
        TradeDirection::Outgoing => Decimal::ONE + tolerance.get(),
        TradeDirection::Incoming => Decimal::ONE - tolerance.get(),
    };
    amount
        .checked_mul(factor)
        .ok_or_else(|| OptionsError::AmountOverflow(format!("{} with slippage", amount)))
}
