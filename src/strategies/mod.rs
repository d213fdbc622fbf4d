//! Strategy decisions built on the fused signal.

pub mod engine;
pub mod error;

pub use engine::{decide, EngineState, StrategyEngine};
pub use error::EngineError;
