//! Fusion weights per signal source

use crate::models::signal::SignalSource;

/// Fixed voting weight of each analytical lens
pub struct SourceWeights;

impl SourceWeights {
    pub const SPIKE_DETECTION: f64 = 0.40;
    pub const PRICE_DIVERGENCE: f64 = 0.30;
    pub const SENTIMENT_ANALYSIS: f64 = 0.20;
    pub const EXTERNAL: f64 = 0.10;

    /// Get weight for a source
    pub fn get(source: SignalSource) -> f64 {
        match source {
            SignalSource::SpikeDetection => Self::SPIKE_DETECTION,
            SignalSource::PriceDivergence => Self::PRICE_DIVERGENCE,
            SignalSource::SentimentAnalysis => Self::SENTIMENT_ANALYSIS,
            SignalSource::External => Self::EXTERNAL,
        }
    }

    /// The three built-in processors carry the full vote
    pub fn verify() -> bool {
        (Self::SPIKE_DETECTION + Self::PRICE_DIVERGENCE + Self::SENTIMENT_ANALYSIS - 0.9).abs()
            < 0.001
    }
}
