//! Raw provider readings and the validated market snapshot built from them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spot quote from the primary exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotSnapshot {
    pub price: f64,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub volume_24h: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Trade-flow summary from the secondary exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSnapshot {
    pub last_price: Option<f64>,
    pub volume_24h: Option<f64>,
    pub buy_volume: f64,
    pub sell_volume: f64,
    pub trade_count: usize,
    pub vwap: Option<f64>,
    pub window_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    pub value: f64,
    pub classification: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub slot: u64,
    pub timestamp: DateTime<Utc>,
}

/// Whatever the providers returned for one ingestion cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketContext {
    pub spot: Option<SpotSnapshot>,
    pub flow: Option<FlowSnapshot>,
    pub sentiment: Option<SentimentSnapshot>,
    pub chain: Option<ChainSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// (buys - sells) / (buys + sells), within [-1, 1]
    pub buy_sell_imbalance: f64,
    pub vwap_delta: Option<f64>,
}

impl Default for FlowMetrics {
    fn default() -> Self {
        Self {
            buy_sell_imbalance: 0.0,
            vwap_delta: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub fear_greed: f64,
}

impl Default for SentimentReading {
    fn default() -> Self {
        Self { fear_greed: 50.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationReason {
    NoSpotPrice,
    PriceMismatch,
    NoRecentTrades,
}

impl fmt::Display for InvalidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InvalidationReason::NoSpotPrice => "No canonical spot price",
            InvalidationReason::PriceMismatch => "Coinbase vs Binance price mismatch > 2%",
            InvalidationReason::NoRecentTrades => "No recent trades in flow window",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub timestamp: DateTime<Utc>,
    pub source_lag_ms: i64,
    pub is_valid: bool,
    pub reasons: Vec<InvalidationReason>,
}

/// Validated, immutable view of the market for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub price: Option<f64>,
    pub spread: Option<f64>,
    pub volume_24h: f64,
    pub flow: FlowMetrics,
    pub sentiment: SentimentReading,
    pub chain_slot: Option<u64>,
    pub meta: SnapshotMeta,
}

impl MarketSnapshot {
    pub fn is_valid(&self) -> bool {
        self.meta.is_valid
    }

    /// Reasons rendered as "a; b"
    pub fn reasons_text(&self) -> String {
        self.meta
            .reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}
