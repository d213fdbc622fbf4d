//! Signal processors and their fusion.

pub mod divergence;
pub mod engine;
pub mod fusion;
pub mod scoring;
pub mod sentiment;
pub mod spike;
pub mod weights;

pub use divergence::{process_divergence, DivergenceConfig};
pub use engine::SignalEngine;
pub use fusion::{FusionOptions, SignalFusion};
pub use scoring::*;
pub use sentiment::{process_sentiment, SentimentConfig};
pub use spike::{process_spike, SpikeConfig};
pub use weights::SourceWeights;
