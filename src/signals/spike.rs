//! Spike detection over the probability history
//!
//! Two modes: a large deviation from the moving average is faded (mean
//! reversion), a fast move that has not yet stretched the average is
//! followed (momentum).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::math;
use crate::history::RollingHistory;
use crate::models::signal::{Signal, SignalDirection, SignalSource, SignalStrength};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikeConfig {
    pub spike_threshold: f64,
    pub lookback: usize,
    pub min_confidence: f64,
    pub velocity_threshold: f64,
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            spike_threshold: 0.05,
            lookback: 20,
            min_confidence: 0.55,
            velocity_threshold: 0.03,
        }
    }
}

fn deviation_strength(deviation_abs: f64) -> SignalStrength {
    if deviation_abs >= 0.12 {
        SignalStrength::VeryStrong
    } else if deviation_abs >= 0.08 {
        SignalStrength::Strong
    } else if deviation_abs >= 0.05 {
        SignalStrength::Moderate
    } else {
        SignalStrength::Weak
    }
}

/// Detect a spike in `current` against `history`
///
/// `history` is expected to already contain `current` as its newest entry.
pub fn process_spike(
    current: f64,
    history: &RollingHistory<f64>,
    config: &SpikeConfig,
) -> Option<Signal> {
    if config.lookback == 0 || history.len() < config.lookback {
        return None;
    }

    let ma = math::sma(&history.tail(config.lookback), config.lookback)?;
    let deviation = if ma > 0.0 { (current - ma) / ma } else { 0.0 };
    let deviation_abs = deviation.abs();

    let velocity = history
        .back(2)
        .map(|&base| math::relative_change(current, base))
        .unwrap_or(0.0);

    if deviation_abs >= config.spike_threshold {
        let direction = if deviation > 0.0 {
            SignalDirection::Bearish
        } else {
            SignalDirection::Bullish
        };
        let confidence = (0.50 + (deviation_abs - config.spike_threshold) * 3.0).min(0.90);
        if confidence < config.min_confidence {
            debug!(deviation, confidence, "Spike deviation below confidence floor");
            return None;
        }

        return Some(
            Signal::new(
                SignalSource::SpikeDetection,
                direction,
                deviation_strength(deviation_abs),
                confidence,
            )
            .with_metadata("mode", "ma_deviation")
            .with_metadata("deviation", deviation)
            .with_metadata("ma", ma)
            .with_metadata("velocity", velocity),
        );
    }

    if velocity.abs() >= config.velocity_threshold
        && deviation_abs < config.spike_threshold * 0.6
    {
        let direction = SignalDirection::from_sign(velocity);
        let multiples = velocity.abs() / config.velocity_threshold;
        let (strength, confidence) = if multiples >= 3.0 {
            (SignalStrength::Moderate, 0.65)
        } else if multiples >= 2.0 {
            (SignalStrength::Weak, 0.60)
        } else {
            (SignalStrength::Weak, 0.57)
        };
        if confidence < config.min_confidence {
            return None;
        }

        return Some(
            Signal::new(SignalSource::SpikeDetection, direction, strength, confidence)
                .with_metadata("mode", "velocity")
                .with_metadata("velocity", velocity)
                .with_metadata("ma", ma)
                .with_metadata("deviation", deviation),
        );
    }

    None
}
