//! Mispricing between the market's UP probability and spot momentum

use serde::{Deserialize, Serialize};

use crate::common::math;
use crate::history::RollingHistory;
use crate::models::signal::{Signal, SignalDirection, SignalSource, SignalStrength};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DivergenceConfig {
    pub momentum_threshold: f64,
    pub extreme_high: f64,
    pub extreme_low: f64,
    pub mid_low: f64,
    pub mid_high: f64,
    /// Momentum tolerated against a fade before it is called off
    pub fade_tolerance: f64,
    pub min_confidence: f64,
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            momentum_threshold: 0.003,
            extreme_high: 0.68,
            extreme_low: 0.32,
            mid_low: 0.35,
            mid_high: 0.65,
            fade_tolerance: 0.001,
            min_confidence: 0.55,
        }
    }
}

/// Spot momentum against the reading two samples back, 0 without enough data
fn spot_momentum(spot: Option<f64>, history: &RollingHistory<f64>) -> f64 {
    match (spot, history.back(2)) {
        (Some(spot), Some(&base)) => math::relative_change(spot, base),
        _ => 0.0,
    }
}

fn fade(
    direction: SignalDirection,
    kind: &str,
    probability: f64,
    momentum: f64,
    extremeness: f64,
    config: &DivergenceConfig,
) -> Signal {
    let confidence = (config.min_confidence + extremeness * 0.25).min(0.80);
    let strength = if extremeness > 0.5 {
        SignalStrength::Strong
    } else {
        SignalStrength::Moderate
    };

    Signal::new(SignalSource::PriceDivergence, direction, strength, confidence)
        .with_metadata("type", kind)
        .with_metadata("probability", probability)
        .with_metadata("spot_momentum", momentum)
        .with_metadata("extremeness", extremeness)
}

/// Compare the UP probability with where spot is heading
///
/// A present `spot` is appended to `spot_history` before momentum is measured.
pub fn process_divergence(
    probability: f64,
    spot: Option<f64>,
    spot_history: &mut RollingHistory<f64>,
    config: &DivergenceConfig,
) -> Option<Signal> {
    let spot = spot.filter(|s| s.is_finite());
    if let Some(price) = spot {
        spot_history.push(price);
    }
    let momentum = spot_momentum(spot, spot_history);

    if probability >= config.extreme_high && momentum <= config.fade_tolerance {
        let range = 1.0 - config.extreme_high;
        let extremeness = if range > 0.0 {
            (probability - config.extreme_high) / range
        } else {
            0.0
        };
        return Some(fade(
            SignalDirection::Bearish,
            "extreme_prob_fade_down",
            probability,
            momentum,
            extremeness,
            config,
        ));
    }

    if probability <= config.extreme_low && momentum >= -config.fade_tolerance {
        let extremeness = if config.extreme_low > 0.0 {
            (config.extreme_low - probability) / config.extreme_low
        } else {
            0.0
        };
        return Some(fade(
            SignalDirection::Bullish,
            "extreme_prob_fade_up",
            probability,
            momentum,
            extremeness,
            config,
        ));
    }

    if probability >= config.mid_low
        && probability <= config.mid_high
        && config.momentum_threshold > 0.0
        && momentum.abs() >= config.momentum_threshold
    {
        let multiples = momentum.abs() / config.momentum_threshold;
        let confidence = (0.55 + (multiples - 1.0).min(2.0) * 0.08).min(0.78);
        let strength = if multiples >= 3.0 {
            SignalStrength::Strong
        } else if multiples >= 2.0 {
            SignalStrength::Moderate
        } else {
            SignalStrength::Weak
        };
        if confidence < config.min_confidence {
            return None;
        }

        return Some(
            Signal::new(
                SignalSource::PriceDivergence,
                SignalDirection::from_sign(momentum),
                strength,
                confidence,
            )
            .with_metadata("type", "momentum_mispricing")
            .with_metadata("probability", probability)
            .with_metadata("spot_momentum", momentum)
            .with_metadata("multiples", multiples),
        );
    }

    None
}
