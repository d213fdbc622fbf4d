//! Momentum indicators: RSI, MACD, deltas

pub mod delta;
pub mod macd;
pub mod rsi;

pub use delta::*;
pub use macd::*;
pub use rsi::*;
