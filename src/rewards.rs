//! Time-gated creator reward claims.

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::PlatformConfig;
use crate::registry::TokenRegistry;
use crate::trading::{generate_tx_hash, TransactionRecord, TxKind, TxStatus};

// The first claim pays the larger share of accrued fees, later claims a
// steady trickle.
const FIRST_CLAIM_DIVISOR: f64 = 10.0;
const RECURRING_CLAIM_DIVISOR: f64 = 20.0;

#[derive(Debug, Clone, Serialize)]
pub struct ClaimReceipt {
    pub symbol: String,
    pub amount: f64,
    pub tx_hash: String,
    pub next_claim_available: DateTime<Utc>,
}

/// Creator reward claims against one registry.
#[derive(Clone)]
pub struct CreatorRewards {
    registry: Arc<TokenRegistry>,
    config: PlatformConfig,
}

impl CreatorRewards {
    pub fn new(registry: Arc<TokenRegistry>, config: PlatformConfig) -> Self {
        Self { registry, config }
    }

    /// Claim accrued creator rewards for `symbol` at `at`.
    ///
    /// Refused while the previous claim's waiting period is still running;
    /// a successful claim opens the next waiting period.
    pub fn claim(&self, symbol: &str, at: DateTime<Utc>) -> Result<ClaimReceipt> {
        let entry = self.registry.entry(symbol)?;
        let mut state = entry
            .state
            .lock()
            .map_err(|e| anyhow!("supply state lock poisoned: {e}"))?;

        let divisor = match (state.last_claim, state.next_claim_available) {
            (None, _) => FIRST_CLAIM_DIVISOR,
            (Some(_), Some(next)) if at < next => {
                bail!("next claim available in {}", format_time_until(at, next))
            }
            _ => RECURRING_CLAIM_DIVISOR,
        };

        let amount = state.market_cap * self.config.creator_fee_rate / divisor;
        let next_claim_available = at + Duration::days(self.config.reward_claim_period_days);
        state.last_claim = Some(at);
        state.next_claim_available = Some(next_claim_available);
        drop(state);

        let record = TransactionRecord {
            tx_hash: generate_tx_hash(),
            symbol: entry.record.symbol.clone(),
            wallet: entry.record.creator_wallet.clone(),
            kind: TxKind::Claim,
            price: 1.0,
            amount_sol: amount,
            amount_tokens: 0.0,
            fee: 0.0,
            creator_fee: 0.0,
            platform_fee: 0.0,
            timestamp: at,
            status: TxStatus::Confirmed,
        };
        let tx_hash = record.tx_hash.clone();
        entry
            .history
            .lock()
            .map_err(|e| anyhow!("trade history lock poisoned: {e}"))?
            .push(record);

        info!(symbol = %entry.record.symbol, amount, "creator rewards claimed");

        Ok(ClaimReceipt {
            symbol: entry.record.symbol.clone(),
            amount,
            tx_hash,
            next_claim_available,
        })
    }
}

/// "2 days and 3 hours" style countdown used in claim-refusal messages.
fn format_time_until(now: DateTime<Utc>, next: DateTime<Utc>) -> String {
    let remaining = next - now;
    if remaining <= Duration::zero() {
        return "now".to_string();
    }
    let days = remaining.num_days();
    let hours = (remaining - Duration::days(days)).num_hours();
    if days > 0 {
        format!("{} day{} and {} hour{}", days, plural(days), hours, plural(hours))
    } else {
        format!("{} hour{}", hours, plural(hours))
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn countdown_formats_days_and_hours() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let next = now + Duration::days(2) + Duration::hours(3);
        assert_eq!(format_time_until(now, next), "2 days and 3 hours");
        assert_eq!(format_time_until(now, now + Duration::hours(1)), "1 hour");
        assert_eq!(format_time_until(now, now), "now");
    }
}
