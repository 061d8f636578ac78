//! Token registry: listing, lookup and caller-owned supply state.
//!
//! The registry is an explicit context object handed to the launch, trading
//! and rewards flows rather than a process-wide singleton. Each token's
//! mutable market state sits behind its own lock, so concurrent trades
//! against one token serialize their read-modify-write of the supply while
//! trades against different tokens proceed independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing::CurvePricer;
use crate::trading::TransactionRecord;
use crate::{constants, CurveParameters};

/// Immutable identity of a listed token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Canonical uppercase trading symbol.
    pub symbol: String,
    pub name: String,
    pub creator_wallet: String,
    pub contract_address: String,
    pub curve: CurveParameters,
    pub tags: Vec<String>,
    pub launched_at: DateTime<Utc>,
}

/// Mutable market state for one token.
///
/// `current_supply` increases on buys and decreases on sells, never below
/// zero; every mutation happens under the owning token's lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSupplyState {
    pub current_supply: f64,
    /// Spot price of the most recent fill.
    pub last_price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    /// While true, trades price along the bonding curve; cleared once the
    /// market cap reaches the configured limit.
    pub curve_active: bool,
    pub listed_on_dexscreener: bool,
    pub last_claim: Option<DateTime<Utc>>,
    pub next_claim_available: Option<DateTime<Utc>>,
}

impl TokenSupplyState {
    pub fn at_launch(initial_supply: f64, initial_price: f64) -> Self {
        Self {
            current_supply: initial_supply,
            last_price: initial_price,
            market_cap: initial_supply * initial_price,
            volume_24h: 0.0,
            curve_active: true,
            listed_on_dexscreener: false,
            last_claim: None,
            next_claim_available: None,
        }
    }
}

pub(crate) struct TokenEntry {
    pub(crate) record: TokenRecord,
    pub(crate) state: Mutex<TokenSupplyState>,
    pub(crate) history: Mutex<Vec<TransactionRecord>>,
}

/// One row of the public listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListedToken {
    pub symbol: String,
    pub name: String,
    /// Spot price from the curve while it is active, last traded price
    /// afterwards.
    pub price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub curve_active: bool,
    pub contract_address: String,
    pub creator_wallet: String,
    pub tags: Vec<String>,
}

#[derive(Default)]
pub struct TokenRegistry {
    /// Keyed by lowercase symbol.
    tokens: RwLock<HashMap<String, Arc<TokenEntry>>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token. Fails if the symbol is already listed.
    pub fn insert(&self, record: TokenRecord, state: TokenSupplyState) -> Result<()> {
        let key = record.symbol.to_lowercase();
        let mut tokens = self
            .tokens
            .write()
            .map_err(|e| anyhow!("token registry lock poisoned: {e}"))?;
        if tokens.contains_key(&key) {
            bail!("token {} is already listed", record.symbol);
        }
        tokens.insert(
            key,
            Arc::new(TokenEntry {
                record,
                state: Mutex::new(state),
                history: Mutex::new(Vec::new()),
            }),
        );
        Ok(())
    }

    pub(crate) fn entry(&self, symbol: &str) -> Result<Arc<TokenEntry>> {
        let tokens = self
            .tokens
            .read()
            .map_err(|e| anyhow!("token registry lock poisoned: {e}"))?;
        tokens
            .get(&symbol.to_lowercase())
            .cloned()
            .ok_or_else(|| anyhow!("token {symbol} not found"))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.tokens
            .read()
            .map(|tokens| tokens.contains_key(&symbol.to_lowercase()))
            .unwrap_or(false)
    }

    /// Immutable record for one token.
    pub fn token(&self, symbol: &str) -> Result<TokenRecord> {
        Ok(self.entry(symbol)?.record.clone())
    }

    /// Snapshot of one token's market state.
    pub fn supply_state(&self, symbol: &str) -> Result<TokenSupplyState> {
        let entry = self.entry(symbol)?;
        let state = entry
            .state
            .lock()
            .map_err(|e| anyhow!("supply state lock poisoned: {e}"))?;
        Ok(state.clone())
    }

    /// All listed tokens, ordered by market cap descending.
    pub fn listed_tokens(&self) -> Result<Vec<ListedToken>> {
        let tokens = self
            .tokens
            .read()
            .map_err(|e| anyhow!("token registry lock poisoned: {e}"))?;

        let mut listed = Vec::with_capacity(tokens.len());
        for entry in tokens.values() {
            let state = entry
                .state
                .lock()
                .map_err(|e| anyhow!("supply state lock poisoned: {e}"))?;
            let price = if state.curve_active {
                CurvePricer::spot_price(&entry.record.curve, state.current_supply)
            } else {
                state.last_price
            };
            listed.push(ListedToken {
                symbol: entry.record.symbol.clone(),
                name: entry.record.name.clone(),
                price,
                market_cap: state.market_cap,
                volume_24h: state.volume_24h,
                curve_active: state.curve_active,
                contract_address: entry.record.contract_address.clone(),
                creator_wallet: entry.record.creator_wallet.clone(),
                tags: entry.record.tags.clone(),
            });
        }
        listed.sort_by(|a, b| b.market_cap.total_cmp(&a.market_cap));
        Ok(listed)
    }

    /// Hydrate a token from a stored row of the shape the tokens table uses:
    /// `{symbol, name, creator_wallet, market_cap, total_supply,
    /// bonding_curve: {...}}`. The `bonding_curve` column is tolerated both
    /// as an object and as a JSON-encoded string; unknown curve tags degrade
    /// to a flat price rather than rejecting the row.
    pub fn ingest_row(&self, row: &serde_json::Value) -> Result<()> {
        let symbol = row
            .get("symbol")
            .and_then(serde_json::Value::as_str)
            .context("token row missing symbol")?
            .to_uppercase();
        let name = row
            .get("name")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(symbol.as_str())
            .to_string();
        let creator_wallet = row
            .get("creator_wallet")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        let contract_address = row
            .get("contract_address")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();

        let curve_value = curve_column(row);
        let curve = CurveParameters::from_json_lenient(&curve_value);
        let tags = tags_from_curve(&curve_value);

        let current_supply = row
            .get("total_supply")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(constants::DEFAULT_INITIAL_SUPPLY);
        let market_cap = row
            .get("market_cap")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0);
        let volume_24h = curve_value
            .get("volume_24h")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0);
        let launched_at = row
            .get("created_at")
            .and_then(serde_json::Value::as_str)
            .and_then(|raw| raw.parse::<DateTime<Utc>>().ok())
            .unwrap_or_else(Utc::now);

        let record = TokenRecord {
            symbol,
            name,
            creator_wallet,
            contract_address,
            curve,
            tags,
            launched_at,
        };
        let state = TokenSupplyState {
            current_supply,
            last_price: curve.initial_price,
            market_cap,
            volume_24h,
            curve_active: row
                .get("curve_active")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(true),
            listed_on_dexscreener: false,
            last_claim: None,
            next_claim_available: None,
        };
        self.insert(record, state)
    }

    pub(crate) fn record_transaction(&self, symbol: &str, tx: TransactionRecord) -> Result<()> {
        let entry = self.entry(symbol)?;
        entry
            .history
            .lock()
            .map_err(|e| anyhow!("trade history lock poisoned: {e}"))?
            .push(tx);
        Ok(())
    }

    /// Most recent transactions for a token, newest first.
    pub fn trade_history(&self, symbol: &str, limit: usize) -> Result<Vec<TransactionRecord>> {
        let entry = self.entry(symbol)?;
        let history = entry
            .history
            .lock()
            .map_err(|e| anyhow!("trade history lock poisoned: {e}"))?;
        Ok(history.iter().rev().take(limit).cloned().collect())
    }
}

/// Some legacy rows store `bonding_curve` as a JSON-encoded string rather
/// than an object; decode it before parsing either way.
fn curve_column(row: &serde_json::Value) -> serde_json::Value {
    match row.get("bonding_curve") {
        Some(serde_json::Value::String(raw)) => serde_json::from_str(raw).unwrap_or_else(|err| {
            tracing::warn!(%err, "bonding_curve column is not valid JSON, using defaults");
            serde_json::Value::Object(Default::default())
        }),
        Some(value) => value.clone(),
        None => serde_json::Value::Object(Default::default()),
    }
}

fn tags_from_curve(curve_value: &serde_json::Value) -> Vec<String> {
    match curve_value.get("tags") {
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(serde_json::Value::String(tag)) => vec![tag.clone()],
        _ => vec!["meme".to_string()],
    }
}
