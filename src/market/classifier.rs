use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::common::errors::{OptionsError, Result};
use crate::common::types::{MarketStyle, OptionType};

/// Number of `.`-separated components in a market name
pub const NAME_COMPONENTS: usize = 5;

/// A market name decomposed into its parts
///
/// Names look like `WBTC.USDC.AMERICAN.C.60000`:
/// underlying, quote, style, `C`/`P` flag and the encoded strike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketName {
    pub underlying_symbol: String,
    pub quote_symbol: String,
    pub market_style: MarketStyle,
    pub option_type: OptionType,
    pub strike: Decimal,
}

impl MarketName {
    /// Pair label built from the name's own symbols, underlying first for calls
    pub fn pair_label(&self) -> String {
        pair_label(self.option_type, &self.underlying_symbol, &self.quote_symbol)
    }
}

/// Decompose a structured market name
pub fn classify(name: &str) -> Result<MarketName> {
    let components: Vec<&str> = name.split('.').collect();
    if components.len() != NAME_COMPONENTS {
        return Err(OptionsError::malformed(
            name,
            format!(
                "expected {} components, found {}",
                NAME_COMPONENTS,
                components.len()
            ),
        ));
    }

    let underlying_symbol = components[0].trim();
    let quote_symbol = components[1].trim();
    if underlying_symbol.is_empty() || quote_symbol.is_empty() {
        return Err(OptionsError::malformed(name, "empty token symbol"));
    }

    let option_type = OptionType::from_flag(components[3]).ok_or_else(|| {
        OptionsError::malformed(name, format!("unknown option flag {:?}", components[3]))
    })?;

    let strike = decode_strike(components[4]).ok_or_else(|| {
        OptionsError::malformed(name, format!("invalid strike {:?}", components[4]))
    })?;

    Ok(MarketName {
        underlying_symbol: underlying_symbol.to_string(),
        quote_symbol: quote_symbol.to_string(),
        market_style: MarketStyle::parse(components[2]),
        option_type,
        strike,
    })
}

/// Decode the strike component
///
/// A leading `0` stands in for a decimal point: `"0592"` is `0.592`. Any other
/// value is read as a plain decimal literal. Only positive strikes decode.
pub fn decode_strike(encoded: &str) -> Option<Decimal> {
    let encoded = encoded.trim();
    let strike = match encoded.strip_prefix('0') {
        Some(fraction) if !fraction.is_empty() => {
            if !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            Decimal::from_str(&format!("0.{}", fraction)).ok()?
        }
        Some(_) => return None,
        None => Decimal::from_str(encoded).ok()?,
    };

    (strike > Decimal::ZERO).then_some(strike)
}

/// Pair label with the asset delivered on exercise as the base
///
/// Calls read `collateral/payment`, puts read `payment/collateral`.
pub fn pair_label(option_type: OptionType, collateral_symbol: &str, payment_symbol: &str) -> String {
    match option_type {
        OptionType::Call => format!("{}/{}", collateral_symbol, payment_symbol),
        OptionType::Put => format!("{}/{}", payment_symbol, collateral_symbol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_classify_call() {
        let name = classify("WBTC.USDC.AMERICAN.C.80000").unwrap();
        assert_eq!(
            name,
            MarketName {
                underlying_symbol: "WBTC".to_string(),
                quote_symbol: "USDC".to_string(),
                market_style: MarketStyle::American,
                option_type: OptionType::Call,
                strike: dec!(80000),
            }
        );
        assert_eq!(name.pair_label(), "WBTC/USDC");
    }

    #[test]
    fn test_fractional_strike_encoding() {
        let name = classify("WBTC.USDC.AMERICAN.C.0592").unwrap();
        assert_eq!(name.strike, dec!(0.592));
    }

    #[test]
    fn test_put_pair_is_inverted() {
        let name = classify("WBTC.USDC.AMERICAN.P.50000").unwrap();
        assert_eq!(name.option_type, OptionType::Put);
        assert_eq!(name.pair_label(), "USDC/WBTC");
    }

    #[test]
    fn test_too_few_components() {
        let err = classify("WBTC.USDC.AMERICAN.C").unwrap_err();
        assert!(matches!(err, OptionsError::MalformedMarketName { .. }));
    }

    #[test]
    fn test_rejects_bad_flag_and_strike() {
        assert!(classify("WBTC.USDC.AMERICAN.X.100").is_err());
        assert!(classify("WBTC.USDC.AMERICAN.C.abc").is_err());
        assert!(classify("WBTC.USDC.AMERICAN.C.0").is_err());
        assert!(classify("WBTC.USDC.AMERICAN.C.-5").is_err());
    }

    #[test]
    fn test_classify_is_idempotent() {
        let first = classify("WETH.USDC.EUROPEAN.P.0592").unwrap();
        let second = classify("WETH.USDC.EUROPEAN.P.0592").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pair_label_from_tokens() {
        assert_eq!(pair_label(OptionType::Call, "WBTC", "USDC"), "WBTC/USDC");
        assert_eq!(pair_label(OptionType::Put, "USDC", "WBTC"), "WBTC/USDC");
    }
}
