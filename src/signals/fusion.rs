//! Weighted voting of processor signals into one consensus

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::math::round_to;
use crate::models::signal::{FusedSignal, FusionMetadata, Signal, SignalDirection};
use crate::signals::scoring::{contribution, mean_confidence};

/// Signals older than this are ignored
pub const RECENCY_WINDOW_SECONDS: i64 = 300;
/// Below this total conviction there is nothing to fuse
pub const MIN_TOTAL_CONTRIBUTION: f64 = 1e-4;
pub const ACTIONABLE_SCORE: f64 = 60.0;
pub const ACTIONABLE_CONFIDENCE: f64 = 0.6;
pub const STRONG_SCORE: f64 = 70.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionOptions {
    pub min_signals: usize,
    pub min_score: f64,
}

impl Default for FusionOptions {
    fn default() -> Self {
        Self {
            min_signals: 1,
            min_score: 60.0,
        }
    }
}

pub struct SignalFusion;

impl SignalFusion {
    /// Fuse against the current time
    pub fn fuse(signals: &[Signal], options: &FusionOptions) -> Option<FusedSignal> {
        Self::fuse_at(signals, options, Utc::now())
    }

    /// Fuse the signals that are still recent at `now`
    pub fn fuse_at(
        signals: &[Signal],
        options: &FusionOptions,
        now: DateTime<Utc>,
    ) -> Option<FusedSignal> {
        if signals.len() < options.min_signals {
            return None;
        }

        let window = Duration::seconds(RECENCY_WINDOW_SECONDS);
        let recent: Vec<Signal> = signals
            .iter()
            .filter(|s| now - s.timestamp < window)
            .cloned()
            .collect();
        if recent.is_empty() || recent.len() < options.min_signals {
            return None;
        }

        let (bullish, bearish) =
            recent
                .iter()
                .fold((0.0, 0.0), |(bull, bear), signal| match signal.direction {
                    SignalDirection::Bullish => (bull + contribution(signal), bear),
                    SignalDirection::Bearish => (bull, bear + contribution(signal)),
                });

        let total = bullish + bearish;
        if total < MIN_TOTAL_CONTRIBUTION {
            return None;
        }

        let direction = if bullish >= bearish {
            SignalDirection::Bullish
        } else {
            SignalDirection::Bearish
        };
        let score = bullish.max(bearish) / total * 100.0;
        let confidence = mean_confidence(&recent);

        if score < options.min_score {
            debug!(score, confidence, "Consensus below minimum score");
            return None;
        }

        let metadata = FusionMetadata {
            bullish_contrib: round_to(bullish, 4),
            bearish_contrib: round_to(bearish, 4),
            total_contrib: round_to(total, 4),
            num_bullish: recent
                .iter()
                .filter(|s| s.direction == SignalDirection::Bullish)
                .count(),
            num_bearish: recent
                .iter()
                .filter(|s| s.direction == SignalDirection::Bearish)
                .count(),
        };

        Some(FusedSignal {
            direction,
            score,
            confidence,
            is_actionable: score >= ACTIONABLE_SCORE && confidence >= ACTIONABLE_CONFIDENCE,
            is_strong: score >= STRONG_SCORE,
            signals: recent,
            metadata,
        })
    }
}
