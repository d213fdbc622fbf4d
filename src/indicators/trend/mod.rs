//! Trend indicators

pub mod heiken_ashi;

pub use heiken_ashi::*;
