//! Token launch flow: parameter validation, registration and initial mint.

use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PlatformConfig;
use crate::constants::*;
use crate::registry::{TokenRecord, TokenRegistry, TokenSupplyState};
use crate::trading::{
    generate_tx_hash, TradeOrder, TradingEngine, TransactionRecord, TxKind, TxStatus,
};
use crate::{CurveParameters, CurveType};

/// User-supplied launch parameters. A missing curve takes the platform's
/// default linear curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenLaunchParams {
    pub name: String,
    pub symbol: String,
    pub creator_wallet: String,
    pub initial_supply: f64,
    pub curve: Option<CurveParameters>,
    pub tags: Vec<String>,
}

impl Default for TokenLaunchParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            creator_wallet: String::new(),
            initial_supply: DEFAULT_INITIAL_SUPPLY,
            curve: None,
            tags: Vec::new(),
        }
    }
}

/// Outcome of a successful launch.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchReceipt {
    pub symbol: String,
    pub name: String,
    pub contract_address: String,
    pub mint_tx_hash: String,
    pub initial_price: f64,
    pub initial_market_cap: f64,
    pub creator_allocation: f64,
    pub treasury_allocation: f64,
}

/// Launch coordinator. Also exposes the initial-supply purchase flow, which
/// shares the trade executor's buy path.
#[derive(Clone)]
pub struct LaunchPad {
    registry: Arc<TokenRegistry>,
    config: PlatformConfig,
    trading: TradingEngine,
}

impl LaunchPad {
    pub fn new(registry: Arc<TokenRegistry>, config: PlatformConfig) -> Self {
        let trading = TradingEngine::new(registry.clone(), config.clone());
        Self {
            registry,
            config,
            trading,
        }
    }

    pub fn launch_token(
        &self,
        params: TokenLaunchParams,
        at: DateTime<Utc>,
    ) -> Result<LaunchReceipt> {
        Self::validate_launch_params(&params)?;

        let curve = params.curve.unwrap_or_default();
        let symbol = params.symbol.trim().to_uppercase();
        let contract_address = generate_contract_address();

        // Initial mint: a configured share of the supply goes to the
        // platform treasury, the remainder to the creator.
        let treasury_allocation = params.initial_supply * self.config.treasury_mint_rate;
        let creator_allocation = params.initial_supply - treasury_allocation;
        let initial_price = curve.initial_price;
        let initial_market_cap = initial_price * params.initial_supply;

        let record = TokenRecord {
            symbol: symbol.clone(),
            name: params.name.trim().to_string(),
            creator_wallet: params.creator_wallet.clone(),
            contract_address: contract_address.clone(),
            curve,
            tags: params.tags.clone(),
            launched_at: at,
        };
        self.registry.insert(
            record,
            TokenSupplyState::at_launch(params.initial_supply, initial_price),
        )?;

        let mint_tx = TransactionRecord {
            tx_hash: generate_tx_hash(),
            symbol: symbol.clone(),
            wallet: params.creator_wallet.clone(),
            kind: TxKind::Mint,
            price: initial_price,
            amount_sol: initial_market_cap,
            amount_tokens: params.initial_supply,
            fee: 0.0,
            creator_fee: 0.0,
            platform_fee: 0.0,
            timestamp: at,
            status: TxStatus::Confirmed,
        };
        let mint_tx_hash = mint_tx.tx_hash.clone();
        self.registry.record_transaction(&symbol, mint_tx)?;

        info!(
            symbol = %symbol,
            contract = %contract_address,
            supply = params.initial_supply,
            "token launched"
        );

        Ok(LaunchReceipt {
            symbol,
            name: params.name.trim().to_string(),
            contract_address,
            mint_tx_hash,
            initial_price,
            initial_market_cap,
            creator_allocation,
            treasury_allocation,
        })
    }

    /// Purchase from a freshly launched token. Identical contract to the
    /// trade executor's buy path.
    pub fn buy_initial_supply(
        &self,
        symbol: &str,
        wallet: &str,
        sol_amount: f64,
        at: DateTime<Utc>,
    ) -> Result<TransactionRecord> {
        if wallet.trim().is_empty() {
            bail!("Wallet address is required");
        }
        self.trading
            .execute(symbol, wallet, TradeOrder::Buy { sol_in: sol_amount }, at)
    }

    fn validate_launch_params(params: &TokenLaunchParams) -> Result<()> {
        let name = params.name.trim();
        if name.is_empty() {
            bail!("Token name cannot be empty");
        }
        if name.len() > MAX_NAME_LENGTH {
            bail!("Token name must be at most {MAX_NAME_LENGTH} characters");
        }

        let symbol = params.symbol.trim();
        if symbol.is_empty() {
            bail!("Token symbol cannot be empty");
        }
        if symbol.len() > MAX_SYMBOL_LENGTH {
            bail!("Token symbol must be at most {MAX_SYMBOL_LENGTH} characters");
        }

        if params.creator_wallet.trim().is_empty() {
            bail!("Creator wallet is required");
        }

        if !params.initial_supply.is_finite()
            || params.initial_supply < MIN_INITIAL_SUPPLY
            || params.initial_supply > MAX_INITIAL_SUPPLY
        {
            bail!(
                "Initial supply must be between {} and {}",
                MIN_INITIAL_SUPPLY,
                MAX_INITIAL_SUPPLY
            );
        }

        if let Some(curve) = &params.curve {
            Self::validate_curve(curve)?;
        }
        Ok(())
    }

    fn validate_curve(curve: &CurveParameters) -> Result<()> {
        if !curve.initial_price.is_finite()
            || curve.initial_price < MIN_INITIAL_PRICE
            || curve.initial_price > MAX_INITIAL_PRICE
        {
            bail!(
                "Initial price must be between {} and {} SOL",
                MIN_INITIAL_PRICE,
                MAX_INITIAL_PRICE
            );
        }
        match curve.curve_type {
            CurveType::Linear { slope } => {
                if !slope.is_finite() || slope < 0.0 {
                    bail!("Linear slope must be non-negative, got {slope}");
                }
            }
            CurveType::Exponential { growth_rate } => {
                if !growth_rate.is_finite() || growth_rate <= 1.0 || growth_rate > MAX_GROWTH_RATE {
                    bail!(
                        "Exponential growth rate must be in (1.0, {MAX_GROWTH_RATE}], got {growth_rate}"
                    );
                }
            }
            CurveType::Logarithmic { log_coefficient } => {
                if !log_coefficient.is_finite() || log_coefficient < 0.0 {
                    bail!("Log coefficient must be non-negative, got {log_coefficient}");
                }
            }
        }
        Ok(())
    }
}

/// Locally generated placeholder for the deployed contract address.
fn generate_contract_address() -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill(&mut bytes[..]);
    format!("Wybe{}", hex::encode(bytes))
}
