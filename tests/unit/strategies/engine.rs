//! Unit tests for the strategy decision engine

use chrono::Utc;
use polywrath::config::StrategyConfig;
use polywrath::ingestion::{build_snapshot, Ingestor};
use polywrath::metrics::Metrics;
use polywrath::models::decision::{DecisionKind, TradeSide};
use polywrath::models::signal::{Signal, SignalDirection, SignalSource, SignalStrength};
use polywrath::models::snapshot::MarketContext;
use polywrath::strategies::{decide, EngineError, StrategyEngine};
use std::sync::Arc;
use std::time::Duration;

use crate::support::{flow, healthy_ingestor, sentiment, spot, StubFlow, StubSentiment, StubSpot};

fn engine(ingestor: Ingestor) -> StrategyEngine {
    StrategyEngine::new(Arc::new(ingestor), StrategyConfig::default())
}

#[tokio::test]
async fn test_out_of_range_probability_is_rejected() {
    let engine = engine(healthy_ingestor(50.0, 50.0, 50.0));

    assert_eq!(
        engine.evaluate(1.5).await.unwrap_err(),
        EngineError::InvalidProbability(1.5)
    );
    assert!(engine.evaluate(-0.01).await.is_err());
    assert!(engine.evaluate(f64::NAN).await.is_err());
    assert!(engine.state().await.probability_history.is_empty());
}

#[tokio::test]
async fn test_extreme_probability_against_fear_holds() {
    // Divergence fades 0.70 bearish, extreme fear reads bullish: 56.6 < 60
    let engine = engine(healthy_ingestor(50.0, 50.0, 20.0));
    let decision = engine.evaluate(0.70).await.unwrap();

    assert_eq!(decision.kind, DecisionKind::Hold);
    assert_eq!(
        decision.reason.as_deref(),
        Some("Fusion did not produce actionable signal")
    );
    assert!(decision.fused.is_none());
    assert_eq!(decision.signals.len(), 2);

    let divergence = decision
        .signals
        .iter()
        .find(|s| s.source == SignalSource::PriceDivergence)
        .unwrap();
    assert_eq!(divergence.direction, SignalDirection::Bearish);
    assert_eq!(divergence.strength(), SignalStrength::Moderate);
    assert!((divergence.confidence() - 0.565625).abs() < 1e-12);

    let sentiment = decision
        .signals
        .iter()
        .find(|s| s.source == SignalSource::SentimentAnalysis)
        .unwrap();
    assert_eq!(sentiment.direction, SignalDirection::Bullish);
    assert_eq!(sentiment.confidence(), 0.65);
}

#[tokio::test]
async fn test_agreeing_flow_trades() {
    let engine = engine(healthy_ingestor(75.0, 25.0, 5.0));
    let decision = engine.evaluate(0.30).await.unwrap();

    assert_eq!(decision.kind, DecisionKind::Trade);
    assert_eq!(decision.side, Some(TradeSide::Up));
    assert!(decision.reason.is_none());
    let fused = decision.fused.unwrap();
    assert_eq!(fused.score, 100.0);
    assert!((fused.confidence - 0.7078125).abs() < 1e-12);
    assert!(fused.is_strong);
}

#[tokio::test]
async fn test_opposing_flow_vetoes_trade() {
    let engine = engine(healthy_ingestor(25.0, 75.0, 5.0));
    let decision = engine.evaluate(0.30).await.unwrap();

    assert_eq!(decision.kind, DecisionKind::Skip);
    assert_eq!(
        decision.reason.as_deref(),
        Some("Flow disagreement (imbalance=-50.0% vs UP)")
    );
    assert!(decision.fused.is_some());
    assert!(decision.side.is_none());
}

#[tokio::test]
async fn test_weakly_opposing_flow_does_not_veto() {
    let engine = engine(healthy_ingestor(48.0, 52.0, 5.0));
    let decision = engine.evaluate(0.30).await.unwrap();

    assert_eq!(decision.kind, DecisionKind::Trade);
    assert_eq!(decision.side, Some(TradeSide::Up));
}

#[tokio::test]
async fn test_unanimous_but_unconfident_holds() {
    let engine = engine(healthy_ingestor(50.0, 50.0, 40.0));
    let decision = engine.evaluate(0.50).await.unwrap();

    assert_eq!(decision.kind, DecisionKind::Hold);
    assert_eq!(
        decision.reason.as_deref(),
        Some("Signal not strong enough (score=100.0, conf=55%)")
    );
    assert!(decision.fused.is_some());
}

#[tokio::test]
async fn test_quiet_market_holds_without_signals() {
    let engine = engine(healthy_ingestor(50.0, 50.0, 50.0));
    let decision = engine.evaluate(0.50).await.unwrap();

    assert_eq!(decision.kind, DecisionKind::Hold);
    assert_eq!(decision.reason.as_deref(), Some("No signals generated"));
    assert!(decision.signals.is_empty());
}

#[tokio::test]
async fn test_invalid_ingestion_skips() {
    let ingestor = Ingestor::new(
        Arc::new(StubSpot {
            snapshot: None,
            delay: Duration::ZERO,
        }),
        Arc::new(StubFlow(Some(flow(None, 1.0, 0.0, 0)))),
        Arc::new(StubSentiment(Some(sentiment(5.0)))),
        Duration::from_millis(200),
    );
    let engine = engine(ingestor);

    let decision = engine.evaluate(0.30).await.unwrap();
    assert_eq!(decision.kind, DecisionKind::Skip);
    assert_eq!(
        decision.reason.as_deref(),
        Some("Ingestion invalid: No canonical spot price; No recent trades in flow window")
    );
    assert!(decision.signals.is_empty());

    let state = engine.state().await;
    assert_eq!(state.probability_history.len(), 1);
    assert!(state.spot_history.is_empty());
}

#[tokio::test]
async fn test_evaluations_feed_both_histories() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let engine = engine(healthy_ingestor(50.0, 50.0, 50.0)).with_metrics(metrics.clone());

    for p in [0.5, 0.52, 0.49] {
        engine.evaluate(p).await.unwrap();
    }
    engine.feed(0.51).await.unwrap();

    let state = engine.state().await;
    assert_eq!(state.probability_history.to_vec(), vec![0.5, 0.52, 0.49, 0.51]);
    assert_eq!(state.spot_history.len(), 3);
    assert_eq!(
        metrics.decisions_total.with_label_values(&["hold"]).get(),
        3
    );
}

#[test]
fn test_decide_with_external_signal() {
    let snapshot = build_snapshot(
        &MarketContext {
            spot: Some(spot(100_000.0)),
            flow: Some(flow(Some(100_000.0), 10.0, 30.0, 8)),
            ..MarketContext::default()
        },
        Utc::now(),
    );
    let signals = vec![Signal::new(
        SignalSource::External,
        SignalDirection::Bearish,
        SignalStrength::Strong,
        0.8,
    )];

    let decision = decide(signals, snapshot, &StrategyConfig::default(), Utc::now());
    assert_eq!(decision.kind, DecisionKind::Trade);
    assert_eq!(decision.side, Some(TradeSide::Down));
}

#[test]
fn test_decide_without_signals_holds() {
    let snapshot = build_snapshot(&MarketContext::default(), Utc::now());
    let decision = decide(Vec::new(), snapshot, &StrategyConfig::default(), Utc::now());
    assert_eq!(decision.kind, DecisionKind::Hold);
    assert_eq!(decision.reason.as_deref(), Some("No signals generated"));
}
