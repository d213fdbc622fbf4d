use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::signal::{FusedSignal, Signal, SignalDirection};
use crate::models::snapshot::MarketSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Trade,
    Skip,
    Hold,
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionKind::Trade => write!(f, "trade"),
            DecisionKind::Skip => write!(f, "skip"),
            DecisionKind::Hold => write!(f, "hold"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Up,
    Down,
}

impl TradeSide {
    pub fn from_direction(direction: SignalDirection) -> Self {
        match direction {
            SignalDirection::Bullish => TradeSide::Up,
            SignalDirection::Bearish => TradeSide::Down,
        }
    }

    /// +1 for Up, -1 for Down
    pub fn sign(self) -> f64 {
        match self {
            TradeSide::Up => 1.0,
            TradeSide::Down => -1.0,
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Up => write!(f, "UP"),
            TradeSide::Down => write!(f, "DOWN"),
        }
    }
}

/// Outcome of one evaluation cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub kind: DecisionKind,
    pub side: Option<TradeSide>,
    pub reason: Option<String>,
    pub fused: Option<FusedSignal>,
    pub signals: Vec<Signal>,
    pub snapshot: MarketSnapshot,
}

impl Decision {
    pub fn trade(
        side: TradeSide,
        fused: FusedSignal,
        signals: Vec<Signal>,
        snapshot: MarketSnapshot,
    ) -> Self {
        Self {
            kind: DecisionKind::Trade,
            side: Some(side),
            reason: None,
            fused: Some(fused),
            signals,
            snapshot,
        }
    }

    pub fn skip(
        reason: impl Into<String>,
        fused: Option<FusedSignal>,
        signals: Vec<Signal>,
        snapshot: MarketSnapshot,
    ) -> Self {
        Self {
            kind: DecisionKind::Skip,
            side: None,
            reason: Some(reason.into()),
            fused,
            signals,
            snapshot,
        }
    }

    pub fn hold(
        reason: impl Into<String>,
        fused: Option<FusedSignal>,
        signals: Vec<Signal>,
        snapshot: MarketSnapshot,
    ) -> Self {
        Self {
            kind: DecisionKind::Hold,
            side: None,
            reason: Some(reason.into()),
            fused,
            signals,
            snapshot,
        }
    }
}
