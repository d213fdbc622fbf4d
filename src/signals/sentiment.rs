//! Contrarian read of the Fear & Greed index

use serde::{Deserialize, Serialize};

use crate::models::signal::{Signal, SignalDirection, SignalSource, SignalStrength};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub extreme_fear: f64,
    pub extreme_greed: f64,
    pub min_confidence: f64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            extreme_fear: 25.0,
            extreme_greed: 75.0,
            min_confidence: 0.50,
        }
    }
}

/// Bounds of the band that produces no signal
const NEUTRAL_LOW: f64 = 45.0;
const NEUTRAL_HIGH: f64 = 55.0;

fn extreme_tier(extremeness: f64) -> (SignalStrength, f64) {
    if extremeness >= 0.8 {
        (SignalStrength::VeryStrong, 0.85)
    } else if extremeness >= 0.5 {
        (SignalStrength::Strong, 0.75)
    } else {
        (SignalStrength::Moderate, 0.65)
    }
}

/// Extreme fear reads bullish, extreme greed bearish
///
/// `current_price` is carried into the metadata only.
pub fn process_sentiment(
    fear_greed: f64,
    current_price: f64,
    config: &SentimentConfig,
) -> Option<Signal> {
    if !fear_greed.is_finite() {
        return None;
    }

    let (direction, strength, confidence) = if fear_greed <= config.extreme_fear {
        let extremeness = if config.extreme_fear > 0.0 {
            (config.extreme_fear - fear_greed) / config.extreme_fear
        } else {
            0.0
        };
        let (strength, confidence) = extreme_tier(extremeness);
        (SignalDirection::Bullish, strength, confidence)
    } else if fear_greed >= config.extreme_greed {
        let range = 100.0 - config.extreme_greed;
        let extremeness = if range > 0.0 {
            (fear_greed - config.extreme_greed) / range
        } else {
            0.0
        };
        let (strength, confidence) = extreme_tier(extremeness);
        (SignalDirection::Bearish, strength, confidence)
    } else if fear_greed < NEUTRAL_LOW {
        (SignalDirection::Bullish, SignalStrength::Weak, 0.55)
    } else if fear_greed > NEUTRAL_HIGH {
        (SignalDirection::Bearish, SignalStrength::Weak, 0.55)
    } else {
        return None;
    };

    if confidence < config.min_confidence {
        return None;
    }

    Some(
        Signal::new(SignalSource::SentimentAnalysis, direction, strength, confidence)
            .with_metadata("fear_greed_value", fear_greed)
            .with_metadata("current_price", current_price),
    )
}
