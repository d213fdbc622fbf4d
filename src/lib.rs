//! Polywrath signal engine
//!
//! Decision core of a short-horizon prediction-market agent: ingests spot,
//! flow, sentiment and chain data, derives directional signals from three
//! processors, fuses them by weighted voting and gates the result behind a
//! flow-confirmation check. A separate technical-indicator engine scores
//! candle series for the market scanner.

pub mod common;
pub mod config;
pub mod core;
pub mod history;
pub mod indicators;
pub mod ingestion;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod scanner;
pub mod services;
pub mod signals;
pub mod strategies;
