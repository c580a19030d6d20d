//! Error types for the application

use thiserror::Error;

/// Result type alias using our OptionsError
pub type Result<T> = std::result::Result<T, OptionsError>;

/// Main error type for derivation and collaborator operations
#[derive(Error, Debug)]
pub enum OptionsError {
    /// Token decimal precision is negative, fractional or beyond the supported scale
    #[error("Invalid token decimals: {0}")]
    InvalidDecimals(String),

    /// Market name does not decompose into `{underlying}.{quote}.{style}.{C|P}.{strike}`
    #[error("Malformed market name {name:?}: {reason}")]
    MalformedMarketName { name: String, reason: String },

    /// A divisor that must be nonzero was zero
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// Pro-rata computation against an empty LP token supply
    #[error("Insufficient LP token supply: requested {requested} of {supply}")]
    InsufficientSupply { requested: String, supply: String },

    /// A raw on-chain integer does not fit the decimal range
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    /// Raw token amounts are unsigned
    #[error("Negative amount: {0}")]
    NegativeAmount(String),

    /// Numeric input outside the domain of a computation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OptionsError {
    pub(crate) fn malformed(name: &str, reason: impl Into<String>) -> Self {
        OptionsError::MalformedMarketName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error concerns a single upstream record rather than the
    /// collaborator or the process as a whole
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            OptionsError::InvalidDecimals(_)
                | OptionsError::MalformedMarketName { .. }
                | OptionsError::DivisionByZero(_)
                | OptionsError::InsufficientSupply { .. }
                | OptionsError::AmountOverflow(_)
                | OptionsError::NegativeAmount(_)
                | OptionsError::InvalidInput(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message() {
        let err = OptionsError::malformed("WBTC.USDC", "expected 5 components, found 2");
        assert_eq!(
            err.to_string(),
            "Malformed market name \"WBTC.USDC\": expected 5 components, found 2"
        );
        assert!(err.is_record_level());
    }

    #[test]
    fn test_collaborator_errors_are_not_record_level() {
        let err = OptionsError::InvalidResponse("status 502".to_string());
        assert!(!err.is_record_level());
    }
}
