//! Platform-wide trading and fee configuration.
//!
//! The admin console tunes these settings at runtime; everything else in the
//! crate receives a validated [`PlatformConfig`] explicitly instead of
//! reading process-global state.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Fraction of each trade's value paid to the token creator.
    pub creator_fee_rate: f64,
    /// Fraction of each trade's value retained by the platform.
    pub platform_fee_rate: f64,
    /// Market cap at which bonding-curve pricing retires and trades execute
    /// at the last traded price.
    pub bonding_curve_limit: f64,
    /// Market cap at which a token becomes eligible for DEX screener listing.
    pub dexscreener_threshold: f64,
    /// Share of the initial mint routed to the platform treasury.
    pub treasury_mint_rate: f64,
    /// Days a creator must wait between reward claims.
    pub reward_claim_period_days: i64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            creator_fee_rate: DEFAULT_CREATOR_FEE_RATE,
            platform_fee_rate: DEFAULT_PLATFORM_FEE_RATE,
            bonding_curve_limit: DEFAULT_BONDING_CURVE_LIMIT,
            dexscreener_threshold: DEFAULT_DEXSCREENER_THRESHOLD,
            treasury_mint_rate: DEFAULT_TREASURY_MINT_RATE,
            reward_claim_period_days: DEFAULT_REWARD_CLAIM_PERIOD_DAYS,
        }
    }
}

impl PlatformConfig {
    /// Parse and validate a TOML document. Missing fields take defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Combined fee fraction applied to every trade.
    pub fn total_fee_rate(&self) -> f64 {
        self.creator_fee_rate + self.platform_fee_rate
    }

    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [
            ("creator_fee_rate", self.creator_fee_rate),
            ("platform_fee_rate", self.platform_fee_rate),
            ("treasury_mint_rate", self.treasury_mint_rate),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                bail!("{} must be a non-negative finite fraction, got {}", name, rate);
            }
        }
        if self.total_fee_rate() > MAX_TOTAL_FEE_RATE {
            bail!(
                "combined fee rate {:.4} exceeds the {:.0}% cap",
                self.total_fee_rate(),
                MAX_TOTAL_FEE_RATE * 100.0
            );
        }
        if self.treasury_mint_rate >= 1.0 {
            bail!(
                "treasury_mint_rate must be below 1.0, got {}",
                self.treasury_mint_rate
            );
        }
        if !self.bonding_curve_limit.is_finite() || self.bonding_curve_limit <= 0.0 {
            bail!(
                "bonding_curve_limit must be positive, got {}",
                self.bonding_curve_limit
            );
        }
        if !self.dexscreener_threshold.is_finite() || self.dexscreener_threshold <= 0.0 {
            bail!(
                "dexscreener_threshold must be positive, got {}",
                self.dexscreener_threshold
            );
        }
        if self.reward_claim_period_days <= 0 {
            bail!(
                "reward_claim_period_days must be positive, got {}",
                self.reward_claim_period_days
            );
        }
        Ok(())
    }
}
