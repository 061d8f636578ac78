//! Trade execution against registry-owned supply state.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PlatformConfig;
use crate::pricing::CurvePricer;
use crate::registry::TokenRegistry;
use crate::CurveParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Mint,
    Buy,
    Sell,
    Claim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Confirmed,
    Pending,
    Failed,
}

/// A trade order against one token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TradeOrder {
    /// Spend `sol_in` SOL buying tokens.
    Buy { sol_in: f64 },
    /// Sell `tokens_in` tokens for SOL.
    Sell { tokens_in: f64 },
}

/// Trade-log entry kept per token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub tx_hash: String,
    pub symbol: String,
    pub wallet: String,
    pub kind: TxKind,
    /// Spot price the fill executed at, SOL per token.
    pub price: f64,
    pub amount_sol: f64,
    pub amount_tokens: f64,
    /// Total fee in SOL; the creator/platform split follows.
    pub fee: f64,
    pub creator_fee: f64,
    pub platform_fee: f64,
    pub timestamp: DateTime<Utc>,
    pub status: TxStatus,
}

/// Executes orders: quotes against the curve, applies the fill to the
/// token's supply state and records the transaction.
#[derive(Clone)]
pub struct TradingEngine {
    registry: Arc<TokenRegistry>,
    config: PlatformConfig,
}

impl TradingEngine {
    pub fn new(registry: Arc<TokenRegistry>, config: PlatformConfig) -> Self {
        Self { registry, config }
    }

    /// Execute an order at `at`, returning the recorded transaction.
    ///
    /// The token's supply lock is held across quote and state update, so two
    /// concurrent orders against one token cannot both price against the
    /// same supply value.
    pub fn execute(
        &self,
        symbol: &str,
        wallet: &str,
        order: TradeOrder,
        at: DateTime<Utc>,
    ) -> Result<TransactionRecord> {
        let entry = self.registry.entry(symbol)?;
        let fee_rate = self.config.total_fee_rate();

        let mut state = entry
            .state
            .lock()
            .map_err(|e| anyhow!("supply state lock poisoned: {e}"))?;

        // Once the curve is retired, fills execute flat at the last traded
        // price instead of walking the curve.
        let curve = if state.curve_active {
            entry.record.curve
        } else {
            CurveParameters::flat(state.last_price)
        };

        let (kind, quote) = match order {
            TradeOrder::Buy { sol_in } => {
                let quote = CurvePricer::quote_buy(&curve, state.current_supply, sol_in, fee_rate)
                    .with_context(|| format!("buy quote for {symbol}"))?;
                state.current_supply += quote.amount_out;
                (TxKind::Buy, quote)
            }
            TradeOrder::Sell { tokens_in } => {
                let quote =
                    CurvePricer::quote_sell(&curve, state.current_supply, tokens_in, fee_rate)
                        .with_context(|| format!("sell quote for {symbol}"))?;
                state.current_supply -= quote.amount_in;
                (TxKind::Sell, quote)
            }
        };

        state.last_price = quote.spot_price;
        state.market_cap = state.current_supply * state.last_price;
        let gross_sol = match kind {
            TxKind::Buy => quote.amount_in,
            _ => quote.amount_out + quote.fee_amount,
        };
        state.volume_24h += gross_sol;

        if state.curve_active && state.market_cap >= self.config.bonding_curve_limit {
            state.curve_active = false;
            info!(
                symbol,
                market_cap = state.market_cap,
                "bonding curve retired, trades now execute at market price"
            );
        }
        if !state.listed_on_dexscreener && state.market_cap >= self.config.dexscreener_threshold {
            state.listed_on_dexscreener = true;
            info!(
                symbol,
                market_cap = state.market_cap,
                "market cap crossed DEX screener threshold"
            );
        }
        drop(state);

        let (creator_fee, platform_fee) = self.split_fee(quote.fee_amount);
        let (amount_sol, amount_tokens) = match kind {
            TxKind::Buy => (quote.amount_in, quote.amount_out),
            _ => (quote.amount_out, quote.amount_in),
        };

        let record = TransactionRecord {
            tx_hash: generate_tx_hash(),
            symbol: entry.record.symbol.clone(),
            wallet: wallet.to_string(),
            kind,
            price: quote.spot_price,
            amount_sol,
            amount_tokens,
            fee: quote.fee_amount,
            creator_fee,
            platform_fee,
            timestamp: at,
            status: TxStatus::Confirmed,
        };
        entry
            .history
            .lock()
            .map_err(|e| anyhow!("trade history lock poisoned: {e}"))?
            .push(record.clone());

        info!(
            symbol = %record.symbol,
            kind = ?record.kind,
            price = record.price,
            amount_tokens = record.amount_tokens,
            "trade executed"
        );
        Ok(record)
    }

    /// Most recent transactions for a token, newest first.
    pub fn trade_history(&self, symbol: &str, limit: usize) -> Result<Vec<TransactionRecord>> {
        self.registry.trade_history(symbol, limit)
    }

    /// Split the quoted fee between creator and platform in proportion to
    /// their configured rates.
    fn split_fee(&self, fee: f64) -> (f64, f64) {
        let total = self.config.total_fee_rate();
        if total <= 0.0 {
            return (0.0, 0.0);
        }
        let creator = fee * self.config.creator_fee_rate / total;
        (creator, fee - creator)
    }
}

/// Locally generated placeholder for an on-chain transaction signature.
pub(crate) fn generate_tx_hash() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}
