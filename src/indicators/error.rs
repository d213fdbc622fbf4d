use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IndicatorError {
    #[error("candle series is empty")]
    EmptySeries,
    #[error("candle {index} has a non-finite {field}")]
    InvalidValue { index: usize, field: &'static str },
}
