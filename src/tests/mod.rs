//! Test suite for the launchpad core.
//!
//! Covers:
//! - Curve pricing and quoting
//! - Launch validation and the initial mint
//! - Trade execution, fee splits and curve retirement
//! - Listing, row ingestion and trade history
//! - Creator reward claims

pub mod trading_tests;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::config::PlatformConfig;
use crate::launch::{LaunchPad, TokenLaunchParams};
use crate::registry::TokenRegistry;
use crate::trading::TradingEngine;
use crate::{CurveParameters, CurveType};

pub const TEST_WALLET: &str = "8xK5SG6UhgXwbsf2Vc9WyBMmRDh79JRzCPyomzPbJwN9";

pub fn test_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

pub fn linear_curve(initial_price: f64, slope: f64) -> CurveParameters {
    CurveParameters {
        initial_price,
        curve_type: CurveType::Linear { slope },
    }
}

pub fn exponential_curve(initial_price: f64, growth_rate: f64) -> CurveParameters {
    CurveParameters {
        initial_price,
        curve_type: CurveType::Exponential { growth_rate },
    }
}

pub fn logarithmic_curve(initial_price: f64, log_coefficient: f64) -> CurveParameters {
    CurveParameters {
        initial_price,
        curve_type: CurveType::Logarithmic { log_coefficient },
    }
}

/// Default launch: a small supply keeps the market cap well under the
/// curve-retirement limit so pricing tests stay on the curve.
pub fn default_launch_params() -> TokenLaunchParams {
    TokenLaunchParams {
        name: "Test Coin".to_string(),
        symbol: "TEST".to_string(),
        creator_wallet: TEST_WALLET.to_string(),
        initial_supply: 1_000.0,
        curve: Some(linear_curve(0.01, 0.0001)),
        tags: vec!["meme".to_string()],
    }
}

/// Launch the default token and hand back the wired-up services.
pub fn launch_test_token(
    config: PlatformConfig,
) -> (Arc<TokenRegistry>, LaunchPad, TradingEngine) {
    let registry = Arc::new(TokenRegistry::new());
    let launchpad = LaunchPad::new(registry.clone(), config.clone());
    launchpad
        .launch_token(default_launch_params(), test_time())
        .expect("default launch should succeed");
    let trading = TradingEngine::new(registry.clone(), config);
    (registry, launchpad, trading)
}
