//! Volume-weighted indicators

pub mod vwap;

pub use vwap::*;
