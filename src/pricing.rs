//! Bonding curve pricing and quoting.
//!
//! The pricer is a pure function of `(curve parameters, supply)`: no shared
//! state, no I/O, safe to call from any number of threads. All token supply
//! state lives with the caller (see [`crate::registry`]).

use serde::Serialize;

use crate::errors::PricingError;
use crate::{CurveParameters, CurveType};

/// A computed trade quote.
///
/// Quotes are immutable snapshots of the curve at the supply they were
/// computed against; staleness is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote {
    /// Spot price at the quoted supply, SOL per token.
    pub spot_price: f64,
    /// What the caller pays in: SOL for buys, tokens for sells.
    pub amount_in: f64,
    /// What the caller receives: tokens for buys, net SOL for sells.
    pub amount_out: f64,
    /// Fee retained by the platform, in SOL.
    pub fee_amount: f64,
    /// Realized per-token price including the fee, SOL per token.
    pub effective_price: f64,
}

/// Stateless spot-price and quote calculator.
pub struct CurvePricer;

impl CurvePricer {
    /// Spot price at `supply` for the given curve.
    ///
    /// `supply` must be non-negative; the result is positive for any valid
    /// [`CurveParameters`] since `initial_price > 0` and every shape term is
    /// non-negative at non-negative supply.
    pub fn spot_price(params: &CurveParameters, supply: f64) -> f64 {
        debug_assert!(supply >= 0.0, "supply must be non-negative");
        match params.curve_type {
            CurveType::Linear { slope } => params.initial_price + supply * slope,
            CurveType::Exponential { growth_rate } => {
                params.initial_price * growth_rate.powf(supply)
            }
            CurveType::Logarithmic { log_coefficient } => {
                params.initial_price + log_coefficient * (supply + 1.0).ln()
            }
        }
    }

    /// Quote a buy of `sol_in` SOL at the current `supply`.
    ///
    /// The fee is taken off the input side: `fee = sol_in * fee_rate`, and
    /// only the remainder converts to tokens. The whole fill executes at the
    /// pre-trade spot price; the curve is intentionally not integrated over
    /// the purchased range.
    pub fn quote_buy(
        params: &CurveParameters,
        supply: f64,
        sol_in: f64,
        fee_rate: f64,
    ) -> Result<Quote, PricingError> {
        if !sol_in.is_finite() || sol_in <= 0.0 {
            return Err(PricingError::InvalidAmount(sol_in));
        }
        debug_assert!((0.0..1.0).contains(&fee_rate), "fee rate outside [0, 1)");

        let spot_price = Self::spot_price(params, supply);
        let fee_amount = sol_in * fee_rate;
        let net_sol = sol_in - fee_amount;
        let amount_out = net_sol / spot_price;

        Ok(Quote {
            spot_price,
            amount_in: sol_in,
            amount_out,
            fee_amount,
            effective_price: sol_in / amount_out,
        })
    }

    /// Quote a sell of `tokens_in` tokens at the current `supply`.
    ///
    /// Symmetric to [`CurvePricer::quote_buy`] with the fee taken off the
    /// output side: `gross = tokens_in * spot`, `fee = gross * fee_rate`,
    /// `amount_out = gross - fee`.
    pub fn quote_sell(
        params: &CurveParameters,
        supply: f64,
        tokens_in: f64,
        fee_rate: f64,
    ) -> Result<Quote, PricingError> {
        if !tokens_in.is_finite() || tokens_in <= 0.0 {
            return Err(PricingError::InvalidAmount(tokens_in));
        }
        if tokens_in > supply {
            return Err(PricingError::InsufficientSupply {
                requested: tokens_in,
                supply,
            });
        }
        debug_assert!((0.0..1.0).contains(&fee_rate), "fee rate outside [0, 1)");

        let spot_price = Self::spot_price(params, supply);
        let gross_sol = tokens_in * spot_price;
        let fee_amount = gross_sol * fee_rate;
        let net_sol = gross_sol - fee_amount;

        Ok(Quote {
            spot_price,
            amount_in: tokens_in,
            amount_out: net_sol,
            fee_amount,
            effective_price: net_sol / tokens_in,
        })
    }
}
