//! Typed failures of the pricing core.
//!
//! All variants are local validation errors returned to the immediate
//! caller; the pricer performs no I/O, so nothing here is transient or
//! retryable.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// Trade input was zero, negative or not a finite number.
    #[error("trade amount must be a positive finite number, got {0}")]
    InvalidAmount(f64),

    /// Sell request exceeds the circulating supply.
    #[error("cannot sell {requested} tokens against a circulating supply of {supply}")]
    InsufficientSupply { requested: f64, supply: f64 },

    /// Stored curve description carries a tag this version does not know.
    #[error("unknown curve type \"{0}\"")]
    UnknownCurveType(String),
}
