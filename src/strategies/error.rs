use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("probability must be a finite number in [0, 1], got {0}")]
    InvalidProbability(f64),
}
