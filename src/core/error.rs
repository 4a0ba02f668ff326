//! Errors raised by the conversion core and its providers.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FxError {
    /// Transport failure or a non-success HTTP status.
    #[error("Network error: {0}")]
    Network(String),

    #[error("No rate data found for currency pair: {from}{to}")]
    RateUnavailable { from: String, to: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Currency catalog has no default pair")]
    NoDefaultPair,
}

impl From<reqwest::Error> for FxError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FxError::InvalidResponse(err.to_string())
        } else {
            FxError::Network(err.to_string())
        }
    }
}

/// Raw input that is not a plain non-negative decimal. Nothing is emitted for it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Input rejected: only digits and a single '.' are allowed")]
pub struct ValidationRejected;
