//! Unit tests for snapshot derivation and validation

use chrono::{Duration, Utc};
use polywrath::ingestion::build_snapshot;
use polywrath::models::snapshot::{ChainSnapshot, InvalidationReason, MarketContext};

use crate::support::{flow, sentiment, spot};

#[test]
fn test_healthy_context_is_valid() {
    let ctx = MarketContext {
        spot: Some(spot(100_000.0)),
        flow: Some(flow(Some(100_050.0), 60.0, 40.0, 12)),
        sentiment: Some(sentiment(30.0)),
        chain: Some(ChainSnapshot {
            slot: 250_000_000,
            timestamp: Utc::now(),
        }),
    };

    let snapshot = build_snapshot(&ctx, Utc::now());
    assert!(snapshot.is_valid());
    assert_eq!(snapshot.price, Some(100_000.0));
    assert_eq!(snapshot.spread, Some(1.0));
    assert_eq!(snapshot.volume_24h, 1_250.0);
    assert!((snapshot.flow.buy_sell_imbalance - 0.2).abs() < 1e-12);
    assert_eq!(snapshot.sentiment.fear_greed, 30.0);
    assert_eq!(snapshot.chain_slot, Some(250_000_000));
    assert!(snapshot.reasons_text().is_empty());
}

#[test]
fn test_flow_price_backs_missing_spot() {
    let ctx = MarketContext {
        flow: Some(flow(Some(99_000.0), 1.0, 1.0, 5)),
        ..MarketContext::default()
    };

    let snapshot = build_snapshot(&ctx, Utc::now());
    assert!(snapshot.is_valid());
    assert_eq!(snapshot.price, Some(99_000.0));
    assert_eq!(snapshot.spread, None);
    assert_eq!(snapshot.volume_24h, 9_000.0);
    assert_eq!(snapshot.flow.buy_sell_imbalance, 0.0);
}

#[test]
fn test_no_price_anywhere_is_invalid() {
    let snapshot = build_snapshot(&MarketContext::default(), Utc::now());
    assert!(!snapshot.is_valid());
    assert_eq!(snapshot.meta.reasons, vec![InvalidationReason::NoSpotPrice]);
    assert_eq!(snapshot.reasons_text(), "No canonical spot price");
    assert_eq!(snapshot.volume_24h, 0.0);
}

#[test]
fn test_missing_sentiment_reads_neutral() {
    let snapshot = build_snapshot(&MarketContext::default(), Utc::now());
    assert_eq!(snapshot.sentiment.fear_greed, 50.0);
}

#[test]
fn test_exchange_mismatch_invalidates() {
    let ctx = MarketContext {
        spot: Some(spot(100_000.0)),
        flow: Some(flow(Some(103_000.0), 1.0, 1.0, 5)),
        ..MarketContext::default()
    };

    let snapshot = build_snapshot(&ctx, Utc::now());
    assert!(!snapshot.is_valid());
    assert_eq!(snapshot.meta.reasons, vec![InvalidationReason::PriceMismatch]);
}

#[test]
fn test_gap_at_threshold_is_tolerated() {
    let ctx = MarketContext {
        spot: Some(spot(100_000.0)),
        flow: Some(flow(Some(101_999.0), 1.0, 1.0, 5)),
        ..MarketContext::default()
    };
    assert!(build_snapshot(&ctx, Utc::now()).is_valid());
}

#[test]
fn test_empty_trade_window_invalidates() {
    let ctx = MarketContext {
        spot: Some(spot(100_000.0)),
        flow: Some(flow(Some(100_000.0), 0.0, 0.0, 0)),
        ..MarketContext::default()
    };

    let snapshot = build_snapshot(&ctx, Utc::now());
    assert_eq!(snapshot.meta.reasons, vec![InvalidationReason::NoRecentTrades]);
    assert_eq!(snapshot.reasons_text(), "No recent trades in flow window");
}

#[test]
fn test_reasons_accumulate() {
    let ctx = MarketContext {
        flow: Some(flow(None, 0.0, 0.0, 0)),
        ..MarketContext::default()
    };

    let snapshot = build_snapshot(&ctx, Utc::now());
    assert_eq!(
        snapshot.reasons_text(),
        "No canonical spot price; No recent trades in flow window"
    );
}

#[test]
fn test_vwap_delta_relative_to_price() {
    let mut recent = flow(Some(100_000.0), 3.0, 1.0, 4);
    recent.vwap = Some(99_000.0);
    let ctx = MarketContext {
        spot: Some(spot(100_000.0)),
        flow: Some(recent),
        ..MarketContext::default()
    };

    let snapshot = build_snapshot(&ctx, Utc::now());
    assert!((snapshot.flow.vwap_delta.unwrap() - 0.01).abs() < 1e-12);
    assert!((snapshot.flow.buy_sell_imbalance - 0.5).abs() < 1e-12);
}

#[test]
fn test_source_lag_is_oldest_reading() {
    let now = Utc::now();
    let mut stale = sentiment(50.0);
    stale.timestamp = now - Duration::seconds(90);
    let mut quote = spot(100_000.0);
    quote.timestamp = now - Duration::milliseconds(250);
    let ctx = MarketContext {
        spot: Some(quote),
        sentiment: Some(stale),
        ..MarketContext::default()
    };

    let snapshot = build_snapshot(&ctx, now);
    assert_eq!(snapshot.meta.source_lag_ms, 90_000);
    assert_eq!(snapshot.meta.timestamp, now);
}
