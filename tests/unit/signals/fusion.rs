//! Unit tests for signal fusion

use chrono::{Duration, TimeZone, Utc};
use polywrath::models::signal::{Signal, SignalDirection, SignalSource, SignalStrength};
use polywrath::signals::fusion::{FusionOptions, SignalFusion};

fn at(
    seconds_ago: i64,
    source: SignalSource,
    direction: SignalDirection,
    strength: SignalStrength,
    confidence: f64,
) -> Signal {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    Signal::at(
        now - Duration::seconds(seconds_ago),
        source,
        direction,
        strength,
        confidence,
    )
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_empty_input_fuses_nothing() {
    assert!(SignalFusion::fuse_at(&[], &FusionOptions::default(), now()).is_none());
}

#[test]
fn test_single_signal_is_unanimous() {
    let signals = vec![at(
        5,
        SignalSource::SentimentAnalysis,
        SignalDirection::Bullish,
        SignalStrength::VeryStrong,
        0.85,
    )];

    let fused = SignalFusion::fuse_at(&signals, &FusionOptions::default(), now()).unwrap();
    assert_eq!(fused.direction, SignalDirection::Bullish);
    assert_eq!(fused.score, 100.0);
    assert_eq!(fused.confidence, 0.85);
    assert!(fused.is_actionable);
    assert!(fused.is_strong);
    assert_eq!(fused.metadata.num_bullish, 1);
    assert_eq!(fused.metadata.num_bearish, 0);
    assert_eq!(fused.metadata.bullish_contrib, 0.17);
}

#[test]
fn test_split_vote_below_minimum_score() {
    // 0.2 * 0.65 * 0.5 = 0.065 bullish against 0.3 * 0.565625 * 0.5 ≈ 0.0848 bearish
    let signals = vec![
        at(
            1,
            SignalSource::SentimentAnalysis,
            SignalDirection::Bullish,
            SignalStrength::Moderate,
            0.65,
        ),
        at(
            1,
            SignalSource::PriceDivergence,
            SignalDirection::Bearish,
            SignalStrength::Moderate,
            0.565625,
        ),
    ];

    assert!(SignalFusion::fuse_at(&signals, &FusionOptions::default(), now()).is_none());

    let permissive = FusionOptions {
        min_score: 0.0,
        ..FusionOptions::default()
    };
    let fused = SignalFusion::fuse_at(&signals, &permissive, now()).unwrap();
    assert_eq!(fused.direction, SignalDirection::Bearish);
    assert!((fused.score - 56.62).abs() < 0.01);
    assert!(!fused.is_actionable);
    assert_eq!(fused.metadata.total_contrib, 0.1498);
}

#[test]
fn test_ties_resolve_bullish() {
    let signals = vec![
        at(
            1,
            SignalSource::SpikeDetection,
            SignalDirection::Bullish,
            SignalStrength::Strong,
            0.7,
        ),
        at(
            1,
            SignalSource::SpikeDetection,
            SignalDirection::Bearish,
            SignalStrength::Strong,
            0.7,
        ),
    ];
    let options = FusionOptions {
        min_score: 0.0,
        ..FusionOptions::default()
    };

    let fused = SignalFusion::fuse_at(&signals, &options, now()).unwrap();
    assert_eq!(fused.direction, SignalDirection::Bullish);
    assert_eq!(fused.score, 50.0);
}

#[test]
fn test_stale_signals_are_dropped() {
    let signals = vec![
        at(
            301,
            SignalSource::SpikeDetection,
            SignalDirection::Bearish,
            SignalStrength::VeryStrong,
            0.9,
        ),
        at(
            10,
            SignalSource::SentimentAnalysis,
            SignalDirection::Bullish,
            SignalStrength::Strong,
            0.75,
        ),
    ];

    let fused = SignalFusion::fuse_at(&signals, &FusionOptions::default(), now()).unwrap();
    assert_eq!(fused.direction, SignalDirection::Bullish);
    assert_eq!(fused.signals.len(), 1);
    assert_eq!(fused.metadata.num_bearish, 0);
}

#[test]
fn test_only_stale_signals_fuse_nothing() {
    let signals = vec![at(
        600,
        SignalSource::SpikeDetection,
        SignalDirection::Bullish,
        SignalStrength::Strong,
        0.8,
    )];
    assert!(SignalFusion::fuse_at(&signals, &FusionOptions::default(), now()).is_none());
}

#[test]
fn test_zero_confidence_has_no_conviction() {
    let signals = vec![at(
        1,
        SignalSource::SpikeDetection,
        SignalDirection::Bullish,
        SignalStrength::Weak,
        0.0,
    )];
    assert!(SignalFusion::fuse_at(&signals, &FusionOptions::default(), now()).is_none());
}

#[test]
fn test_min_signals_gate() {
    let signals = vec![at(
        1,
        SignalSource::SentimentAnalysis,
        SignalDirection::Bullish,
        SignalStrength::VeryStrong,
        0.85,
    )];
    let options = FusionOptions {
        min_signals: 2,
        ..FusionOptions::default()
    };
    assert!(SignalFusion::fuse_at(&signals, &options, now()).is_none());
}

#[test]
fn test_confidence_is_mean_of_all_retained_signals() {
    let signals = vec![
        at(
            1,
            SignalSource::SpikeDetection,
            SignalDirection::Bullish,
            SignalStrength::VeryStrong,
            0.9,
        ),
        at(
            1,
            SignalSource::SentimentAnalysis,
            SignalDirection::Bearish,
            SignalStrength::Weak,
            0.5,
        ),
    ];

    let fused = SignalFusion::fuse_at(&signals, &FusionOptions::default(), now()).unwrap();
    assert_eq!(fused.direction, SignalDirection::Bullish);
    assert!((fused.confidence - 0.7).abs() < 1e-12);
    // 0.36 / (0.36 + 0.025)
    assert!((fused.score - 93.506).abs() < 0.001);
    assert!(fused.is_actionable);
}

#[test]
fn test_three_sources_agreeing_at_max_are_unanimous() {
    let signals: Vec<Signal> = [
        SignalSource::SpikeDetection,
        SignalSource::PriceDivergence,
        SignalSource::SentimentAnalysis,
    ]
    .into_iter()
    .map(|source| {
        at(
            1,
            source,
            SignalDirection::Bullish,
            SignalStrength::VeryStrong,
            1.0,
        )
    })
    .collect();

    let fused = SignalFusion::fuse_at(&signals, &FusionOptions::default(), now()).unwrap();
    assert_eq!(fused.direction, SignalDirection::Bullish);
    assert_eq!(fused.score, 100.0);
    assert_eq!(fused.confidence, 1.0);
    assert!(fused.is_actionable);
    assert!(fused.is_strong);
    assert_eq!(fused.metadata.bullish_contrib, 0.9);
    assert_eq!(fused.metadata.bearish_contrib, 0.0);
    assert_eq!(fused.metadata.num_bullish, 3);
}
