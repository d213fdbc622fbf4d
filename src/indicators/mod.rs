//! Technical indicators over candle series

pub mod error;
pub mod evaluator;

pub mod momentum;
pub mod trend;
pub mod volume;

pub use error::IndicatorError;
pub use evaluator::{compute_indicators, score_indicators, IndicatorScore};
