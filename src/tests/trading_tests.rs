//! Trade execution tests: supply updates, fee splits, curve retirement.

use std::thread;

use approx::assert_relative_eq;

use super::{launch_test_token, test_time, TEST_WALLET};
use crate::config::PlatformConfig;
use crate::errors::PricingError;
use crate::trading::{TradeOrder, TxKind, TxStatus};

#[test]
fn buy_updates_supply_price_and_history() {
    let (registry, _launchpad, trading) = launch_test_token(PlatformConfig::default());
    let before = registry.supply_state("TEST").unwrap();

    let record = trading
        .execute("TEST", TEST_WALLET, TradeOrder::Buy { sol_in: 11.0 }, test_time())
        .unwrap();

    // Spot on the 0.01 + 0.0001 * s curve at supply 1000.
    assert_relative_eq!(record.price, 0.11, max_relative = 1e-12);
    assert_eq!(record.kind, TxKind::Buy);
    assert_eq!(record.status, TxStatus::Confirmed);
    assert_relative_eq!(record.fee, 11.0 * 0.05, max_relative = 1e-12);
    assert_relative_eq!(record.amount_sol, 11.0);
    assert_relative_eq!(record.amount_tokens, (11.0 - record.fee) / 0.11, max_relative = 1e-9);

    let after = registry.supply_state("TEST").unwrap();
    assert_relative_eq!(
        after.current_supply,
        before.current_supply + record.amount_tokens,
        max_relative = 1e-12
    );
    assert_relative_eq!(after.last_price, 0.11, max_relative = 1e-12);
    assert_relative_eq!(after.volume_24h, 11.0);
    assert_relative_eq!(after.market_cap, after.current_supply * 0.11, max_relative = 1e-12);

    let history = trading.trade_history("TEST", 10).unwrap();
    assert_eq!(history.len(), 2); // launch mint plus this buy
    assert_eq!(history[0].kind, TxKind::Buy);
    assert_eq!(history[1].kind, TxKind::Mint);
}

#[test]
fn sell_decreases_supply_and_pays_net_of_fee() {
    let (registry, _launchpad, trading) = launch_test_token(PlatformConfig::default());

    let record = trading
        .execute("TEST", TEST_WALLET, TradeOrder::Sell { tokens_in: 100.0 }, test_time())
        .unwrap();

    assert_eq!(record.kind, TxKind::Sell);
    assert_relative_eq!(record.price, 0.11, max_relative = 1e-12);
    assert_relative_eq!(record.amount_tokens, 100.0);
    let gross = 100.0 * 0.11;
    assert_relative_eq!(record.fee, gross * 0.05, max_relative = 1e-12);
    assert_relative_eq!(record.amount_sol, gross - record.fee, max_relative = 1e-12);

    let state = registry.supply_state("TEST").unwrap();
    assert_relative_eq!(state.current_supply, 900.0);
    assert_relative_eq!(state.volume_24h, gross, max_relative = 1e-12);
}

#[test]
fn fee_splits_between_creator_and_platform() {
    let (_registry, _launchpad, trading) = launch_test_token(PlatformConfig::default());

    let record = trading
        .execute("TEST", TEST_WALLET, TradeOrder::Buy { sol_in: 20.0 }, test_time())
        .unwrap();

    // Equal configured rates split the fee evenly.
    assert_relative_eq!(record.creator_fee, record.fee / 2.0, max_relative = 1e-12);
    assert_relative_eq!(record.platform_fee, record.fee / 2.0, max_relative = 1e-12);
    assert_relative_eq!(record.creator_fee + record.platform_fee, record.fee, max_relative = 1e-12);
}

#[test]
fn oversell_surfaces_insufficient_supply() {
    let (_registry, _launchpad, trading) = launch_test_token(PlatformConfig::default());

    let err = trading
        .execute(
            "TEST",
            TEST_WALLET,
            TradeOrder::Sell { tokens_in: 1_000_000.0 },
            test_time(),
        )
        .unwrap_err();

    assert!(matches!(
        err.root_cause().downcast_ref::<PricingError>(),
        Some(PricingError::InsufficientSupply { .. })
    ));
}

#[test]
fn curve_retires_once_market_cap_reaches_the_limit() {
    let config = PlatformConfig {
        bonding_curve_limit: 100.0,
        ..PlatformConfig::default()
    };
    let (registry, _launchpad, trading) = launch_test_token(config);

    // First buy lifts the market cap past the limit (~120 SOL).
    trading
        .execute("TEST", TEST_WALLET, TradeOrder::Buy { sol_in: 11.0 }, test_time())
        .unwrap();
    let state = registry.supply_state("TEST").unwrap();
    assert!(!state.curve_active);
    assert!(state.market_cap >= 100.0);

    // The next fill executes flat at the last traded price, not the curve
    // price for the grown supply.
    let record = trading
        .execute("TEST", TEST_WALLET, TradeOrder::Buy { sol_in: 5.0 }, test_time())
        .unwrap();
    assert_relative_eq!(record.price, 0.11, max_relative = 1e-12);
}

#[test]
fn market_cap_crossing_flags_dexscreener_listing() {
    let config = PlatformConfig {
        dexscreener_threshold: 100.0,
        ..PlatformConfig::default()
    };
    let (registry, _launchpad, trading) = launch_test_token(config);

    assert!(!registry.supply_state("TEST").unwrap().listed_on_dexscreener);
    trading
        .execute("TEST", TEST_WALLET, TradeOrder::Buy { sol_in: 11.0 }, test_time())
        .unwrap();
    assert!(registry.supply_state("TEST").unwrap().listed_on_dexscreener);
}

#[test]
fn trading_an_unlisted_token_fails() {
    let (_registry, _launchpad, trading) = launch_test_token(PlatformConfig::default());
    let err = trading
        .execute("NOPE", TEST_WALLET, TradeOrder::Buy { sol_in: 1.0 }, test_time())
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn concurrent_buys_serialize_per_token() {
    let config = PlatformConfig {
        bonding_curve_limit: 1e12,
        dexscreener_threshold: 1e12,
        ..PlatformConfig::default()
    };
    let (registry, _launchpad, trading) = launch_test_token(config);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let trading = trading.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..25 {
                trading
                    .execute("TEST", TEST_WALLET, TradeOrder::Buy { sol_in: 1.0 }, test_time())
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let history = trading.trade_history("TEST", 1_000).unwrap();
    assert_eq!(history.len(), 101); // launch mint plus 100 buys

    // Every fill was applied; supply only ever moved under the token lock.
    let state = registry.supply_state("TEST").unwrap();
    let bought: f64 = history
        .iter()
        .filter(|tx| tx.kind == TxKind::Buy)
        .map(|tx| tx.amount_tokens)
        .sum();
    assert_relative_eq!(state.current_supply, 1_000.0 + bought, max_relative = 1e-9);
}
