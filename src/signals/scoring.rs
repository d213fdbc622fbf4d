//! Signal score and fusion contribution

use crate::models::signal::{Signal, SignalStrength};
use crate::signals::weights::SourceWeights;

/// Clamp a confidence to [0, 1], mapping NaN to 0
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        return 0.0;
    }
    confidence.clamp(0.0, 1.0)
}

/// 0-100 score of a single signal
///
/// score = (strength / 4 * 0.5 + confidence * 0.5) * 100
pub fn signal_score(strength: SignalStrength, confidence: f64) -> f64 {
    (strength.factor() * 0.5 + clamp_confidence(confidence) * 0.5) * 100.0
}

/// Weighted conviction a signal adds to its direction
pub fn contribution(signal: &Signal) -> f64 {
    SourceWeights::get(signal.source) * clamp_confidence(signal.confidence()) * signal.strength().factor()
}

/// Mean raw confidence of a set of signals, 0 when empty
pub fn mean_confidence(signals: &[Signal]) -> f64 {
    if signals.is_empty() {
        return 0.0;
    }
    signals.iter().map(|s| s.confidence()).sum::<f64>() / signals.len() as f64
}
