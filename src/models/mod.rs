//! Shared data models spanning the engine layers.

pub mod decision;
pub mod indicators;
pub mod signal;
pub mod snapshot;

pub use decision::{Decision, DecisionKind, TradeSide};
pub use indicators::{
    Candle, CandleTrend, HeikenAshiCandle, IndicatorSnapshot, MacdIndicator, Prediction, TaSignal,
};
pub use signal::{
    FusedSignal, FusionMetadata, Signal, SignalDirection, SignalSource, SignalStrength,
};
pub use snapshot::{
    ChainSnapshot, FlowMetrics, FlowSnapshot, InvalidationReason, MarketContext, MarketSnapshot,
    SentimentReading, SentimentSnapshot, SnapshotMeta, SpotSnapshot,
};
