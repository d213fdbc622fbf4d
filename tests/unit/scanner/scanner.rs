//! Unit tests for the market scanner

use polywrath::metrics::Metrics;
use polywrath::models::indicators::TaSignal;
use polywrath::scanner::{
    points_to_candles, suggested_size, AgentConfig, AgentConfigUpdate, MarketScanner,
    MarketToggles, MarketToken, RiskLevel, ScanMarket, ScanSide,
};
use polywrath::services::market_data::PricePoint;
use std::collections::HashMap;
use std::sync::Arc;

use crate::support::StubHistory;

fn series(start: f64, step: f64, len: usize) -> Vec<PricePoint> {
    (0..len)
        .map(|i| PricePoint {
            t: 1_714_560_000 + i as i64 * 60,
            p: start + step * i as f64,
        })
        .collect()
}

fn market(question: &str, slug: &str, up: &str, down: &str) -> ScanMarket {
    ScanMarket {
        question: question.to_string(),
        slug: slug.to_string(),
        tokens: vec![
            MarketToken {
                token_id: up.to_string(),
                outcome: Some("Up".to_string()),
                price: 0.45,
            },
            MarketToken {
                token_id: down.to_string(),
                outcome: Some("Down".to_string()),
                price: 0.55,
            },
        ],
    }
}

fn scanner_with(history: StubHistory, threshold: f64) -> MarketScanner {
    let config = AgentConfig {
        signal_threshold: threshold,
        ..AgentConfig::default()
    };
    MarketScanner::new(Arc::new(history), config)
}

fn history() -> StubHistory {
    let mut points = HashMap::new();
    points.insert("btc-up".to_string(), series(0.80, -0.01, 40));
    points.insert("eth-up".to_string(), series(0.20, 0.01, 40));
    points.insert("sol-up".to_string(), series(0.50, 0.0, 10));
    StubHistory(points)
}

#[tokio::test]
async fn test_falling_up_token_suggests_buying_down() {
    let scanner = scanner_with(history(), 30.0);
    let signals = scanner
        .scan(&[market("Bitcoin Up or Down?", "btc-hourly", "btc-up", "btc-down")])
        .await;

    assert_eq!(signals.len(), 1);
    let signal = &signals[0];
    assert_eq!(signal.side, ScanSide::BuyDown);
    assert_eq!(signal.signal, TaSignal::Short);
    assert_eq!(signal.token_id, "btc-down");
    assert_eq!(signal.price, 0.55);
    assert_eq!(signal.strength, 34.0);
    assert_eq!(signal.suggested_size, 34.0);
    assert_eq!(signal.slug, "btc-hourly");
}

#[tokio::test]
async fn test_rising_up_token_suggests_buying_up() {
    let scanner = scanner_with(history(), 30.0);
    let signals = scanner
        .scan(&[market("Ethereum Up or Down?", "eth-hourly", "eth-up", "eth-down")])
        .await;

    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].side, ScanSide::BuyUp);
    assert_eq!(signals[0].token_id, "eth-up");
    assert_eq!(signals[0].indicators.prediction.long, 67.0);
}

#[tokio::test]
async fn test_default_threshold_filters_weak_calls() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let scanner = MarketScanner::new(Arc::new(history()), AgentConfig::default())
        .with_metrics(metrics.clone());

    let signals = scanner
        .scan(&[market("Bitcoin Up or Down?", "btc-hourly", "btc-up", "btc-down")])
        .await;
    assert!(signals.is_empty());
    assert_eq!(metrics.scan_signals_total.get(), 0);
}

#[tokio::test]
async fn test_unusable_markets_are_skipped() {
    let scanner = scanner_with(history(), 0.0);
    let mut single_token = market("Bitcoin Up or Down?", "one-token", "btc-up", "btc-down");
    single_token.tokens.truncate(1);

    let signals = scanner
        .scan(&[
            single_token,
            // Too little history
            market("Solana Up or Down?", "sol-hourly", "sol-up", "sol-down"),
            // History provider fails
            market("XRP Up or Down?", "xrp-hourly", "xrp-up", "xrp-down"),
        ])
        .await;
    assert!(signals.is_empty());
}

#[tokio::test]
async fn test_disabled_asset_is_skipped() {
    let scanner = scanner_with(history(), 30.0);
    scanner
        .update_config(AgentConfigUpdate {
            markets: Some(MarketToggles {
                btc: false,
                eth: true,
                sol: true,
            }),
            ..AgentConfigUpdate::default()
        })
        .await;

    let signals = scanner
        .scan(&[
            market("Bitcoin Up or Down?", "btc-hourly", "btc-up", "btc-down"),
            market("Ethereum Up or Down?", "eth-hourly", "eth-up", "eth-down"),
        ])
        .await;
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].slug, "eth-hourly");
}

#[tokio::test]
async fn test_results_ranked_by_strength() {
    let scanner = scanner_with(history(), 30.0);
    let signals = scanner
        .scan(&[
            market("Bitcoin Up or Down?", "btc-hourly", "btc-up", "btc-down"),
            market("Ethereum Up or Down?", "eth-hourly", "eth-up", "eth-down"),
        ])
        .await;

    assert_eq!(signals.len(), 2);
    assert!(signals
        .windows(2)
        .all(|pair| pair[0].strength >= pair[1].strength));
}

#[tokio::test]
async fn test_risk_level_update_rederives_threshold() {
    let scanner = scanner_with(StubHistory::default(), 10.0);
    let updated = scanner
        .update_config(AgentConfigUpdate {
            risk_level: Some(RiskLevel::Conservative),
            max_position_size: Some(250.0),
            ..AgentConfigUpdate::default()
        })
        .await;

    assert_eq!(updated.risk_level, RiskLevel::Conservative);
    assert_eq!(updated.signal_threshold, 70.0);
    assert_eq!(updated.max_position_size, 250.0);
    assert_eq!(scanner.config().await, updated);
}

#[test]
fn test_points_to_candles_open_at_previous_price() {
    let candles = points_to_candles(&series(0.40, 0.02, 3));

    assert_eq!(candles.len(), 3);
    assert_eq!(candles[0].open, 0.40);
    assert_eq!(candles[1].open, candles[0].close);
    assert!((candles[2].high - candles[2].close * 1.001).abs() < 1e-12);
    assert!(candles[2].low < candles[2].close);
    assert_eq!(candles[0].timestamp.timestamp(), 1_714_560_000);
}

#[test]
fn test_points_to_candles_keeps_newest() {
    assert_eq!(points_to_candles(&series(0.5, 0.0, 600)).len(), 500);
}

#[test]
fn test_suggested_size() {
    assert_eq!(suggested_size(100.0, 34.0), 34.0);
    assert_eq!(suggested_size(80.0, 55.555), 44.44);
    assert_eq!(suggested_size(50.0, 100.0), 50.0);
}
