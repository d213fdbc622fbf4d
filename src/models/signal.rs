//! Directional signals emitted by the processors and their fused consensus

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::signals::scoring::{clamp_confidence, signal_score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Bullish,
    Bearish,
}

impl SignalDirection {
    /// +1 for bullish, -1 for bearish
    pub fn sign(self) -> f64 {
        match self {
            SignalDirection::Bullish => 1.0,
            SignalDirection::Bearish => -1.0,
        }
    }

    pub fn from_sign(value: f64) -> Self {
        if value > 0.0 {
            SignalDirection::Bullish
        } else {
            SignalDirection::Bearish
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalDirection::Bullish => write!(f, "BULLISH"),
            SignalDirection::Bearish => write!(f, "BEARISH"),
        }
    }
}

/// Ordinal strength tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStrength {
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl SignalStrength {
    /// Numeric weight 1-4
    pub fn value(self) -> u8 {
        match self {
            SignalStrength::Weak => 1,
            SignalStrength::Moderate => 2,
            SignalStrength::Strong => 3,
            SignalStrength::VeryStrong => 4,
        }
    }

    /// Weight normalized to (0, 1]
    pub fn factor(self) -> f64 {
        self.value() as f64 / 4.0
    }
}

/// Analytical lens that produced a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalSource {
    SpikeDetection,
    PriceDivergence,
    SentimentAnalysis,
    /// Signals injected from outside the built-in processors
    External,
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalSource::SpikeDetection => "SpikeDetection",
            SignalSource::PriceDivergence => "PriceDivergence",
            SignalSource::SentimentAnalysis => "SentimentAnalysis",
            SignalSource::External => "External",
        };
        f.write_str(name)
    }
}

/// Immutable processor output; the score is derived from strength and confidence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SignalRecord")]
pub struct Signal {
    pub timestamp: DateTime<Utc>,
    pub source: SignalSource,
    pub direction: SignalDirection,
    strength: SignalStrength,
    confidence: f64,
    score: f64,
    pub metadata: Map<String, Value>,
}

/// Wire form of a signal; any serialized score is ignored and recomputed
#[derive(Deserialize)]
struct SignalRecord {
    timestamp: DateTime<Utc>,
    source: SignalSource,
    direction: SignalDirection,
    strength: SignalStrength,
    confidence: f64,
    #[serde(default)]
    metadata: Map<String, Value>,
}

impl From<SignalRecord> for Signal {
    fn from(record: SignalRecord) -> Self {
        let mut signal = Signal::at(
            record.timestamp,
            record.source,
            record.direction,
            record.strength,
            record.confidence,
        );
        signal.metadata = record.metadata;
        signal
    }
}

impl Signal {
    pub fn new(
        source: SignalSource,
        direction: SignalDirection,
        strength: SignalStrength,
        confidence: f64,
    ) -> Self {
        Self::at(Utc::now(), source, direction, strength, confidence)
    }

    /// Build a signal stamped with an explicit time
    pub fn at(
        timestamp: DateTime<Utc>,
        source: SignalSource,
        direction: SignalDirection,
        strength: SignalStrength,
        confidence: f64,
    ) -> Self {
        let confidence = clamp_confidence(confidence);
        Self {
            timestamp,
            source,
            direction,
            strength,
            confidence,
            score: signal_score(strength, confidence),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn strength(&self) -> SignalStrength {
        self.strength
    }

    /// Confidence clamped to [0, 1]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Derived 0-100 score
    pub fn score(&self) -> f64 {
        self.score
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FusionMetadata {
    pub bullish_contrib: f64,
    pub bearish_contrib: f64,
    pub total_contrib: f64,
    pub num_bullish: usize,
    pub num_bearish: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusedSignal {
    pub direction: SignalDirection,
    /// Winning side's share of total weighted conviction, 0-100
    pub score: f64,
    /// Mean confidence over every retained signal
    pub confidence: f64,
    pub is_actionable: bool,
    pub is_strong: bool,
    pub signals: Vec<Signal>,
    pub metadata: FusionMetadata,
}
