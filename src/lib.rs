//! Wybe Launchpad Core
//!
//! Pricing, launch, listing and trade execution for bonding-curve tokens
//! on the Wybe platform.
//!
//! This crate provides:
//! - Deterministic spot pricing over linear, exponential and logarithmic curves
//! - Buy/sell quoting with fee-adjusted net proceeds
//! - Token launch flow with validated parameters and treasury allocation
//! - A token registry with per-token serialized supply mutation
//! - Trade execution with creator/platform fee splits and curve retirement

use serde::{Deserialize, Serialize};

use crate::errors::PricingError;

pub mod config;
pub mod constants;
pub mod errors;
pub mod launch;
pub mod pricing;
pub mod registry;
pub mod rewards;
pub mod trading;
#[cfg(test)]
mod tests;

/// Curve shape together with its shape-specific parameter.
///
/// Modeling the parameter inside the variant keeps "exactly one parameter
/// set populated for the active shape" as a type-level invariant instead of
/// a runtime check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CurveType {
    /// `price = initial_price + supply * slope`
    Linear { slope: f64 },
    /// `price = initial_price * growth_rate ^ supply`
    ///
    /// `growth_rate` is per-token multiplicative growth (supply measured in
    /// whole tokens, no further normalization). Launch validation bounds the
    /// rate so prices stay finite at realistic supplies.
    Exponential { growth_rate: f64 },
    /// `price = initial_price + log_coefficient * ln(supply + 1)`
    Logarithmic { log_coefficient: f64 },
}

impl CurveType {
    /// Tag used in the serialized form, mirroring the `type` field of the
    /// stored `bonding_curve` JSON column.
    pub fn tag(&self) -> &'static str {
        match self {
            CurveType::Linear { .. } => "linear",
            CurveType::Exponential { .. } => "exponential",
            CurveType::Logarithmic { .. } => "logarithmic",
        }
    }
}

/// Immutable description of one token's pricing curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParameters {
    /// Price at zero supply, in SOL per token. Must be positive.
    pub initial_price: f64,
    #[serde(flatten)]
    pub curve_type: CurveType,
}

impl Default for CurveParameters {
    fn default() -> Self {
        Self {
            initial_price: constants::DEFAULT_INITIAL_PRICE,
            curve_type: CurveType::Linear {
                slope: constants::DEFAULT_LINEAR_SLOPE,
            },
        }
    }
}

impl CurveParameters {
    /// Flat curve pinned at `price`. Used both as the unknown-type fallback
    /// and for tokens whose bonding curve has been retired.
    pub fn flat(price: f64) -> Self {
        Self {
            initial_price: price,
            curve_type: CurveType::Linear { slope: 0.0 },
        }
    }

    /// Strict parse of a stored `bonding_curve` JSON value.
    ///
    /// Accepts the serialized shape of [`CurveParameters`] itself as well as
    /// legacy rows that only carry a `price` field. An unrecognized `type`
    /// tag is an error here; use [`CurveParameters::from_json_lenient`] on
    /// read paths that must always produce a price.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PricingError> {
        let initial_price = value
            .get("initial_price")
            .or_else(|| value.get("price"))
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(constants::DEFAULT_INITIAL_PRICE);

        let tag = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("linear");

        let curve_type = match tag {
            "linear" => CurveType::Linear {
                slope: json_f64(value, "slope", constants::DEFAULT_LINEAR_SLOPE),
            },
            "exponential" => CurveType::Exponential {
                growth_rate: json_f64(value, "growth_rate", constants::DEFAULT_GROWTH_RATE),
            },
            "logarithmic" => CurveType::Logarithmic {
                log_coefficient: json_f64(
                    value,
                    "log_coefficient",
                    constants::DEFAULT_LOG_COEFFICIENT,
                ),
            },
            other => return Err(PricingError::UnknownCurveType(other.to_string())),
        };

        Ok(Self {
            initial_price,
            curve_type,
        })
    }

    /// Lenient parse for listing/display paths: an unknown curve tag degrades
    /// to a flat curve at the row's price instead of failing the whole read.
    pub fn from_json_lenient(value: &serde_json::Value) -> Self {
        match Self::from_json(value) {
            Ok(params) => params,
            Err(err) => {
                let price = value
                    .get("initial_price")
                    .or_else(|| value.get("price"))
                    .and_then(serde_json::Value::as_f64)
                    .unwrap_or(constants::DEFAULT_INITIAL_PRICE);
                tracing::warn!(%err, price, "unrecognized curve description, using flat price");
                Self::flat(price)
            }
        }
    }
}

fn json_f64(value: &serde_json::Value, field: &str, default: f64) -> f64 {
    value
        .get(field)
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(default)
}
