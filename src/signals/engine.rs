//! Runs every processor over one snapshot.

use tracing::debug;

use crate::config::StrategyConfig;
use crate::history::RollingHistory;
use crate::models::signal::Signal;
use crate::models::snapshot::MarketSnapshot;
use crate::signals::divergence::process_divergence;
use crate::signals::sentiment::process_sentiment;
use crate::signals::spike::process_spike;

pub struct SignalEngine;

impl SignalEngine {
    /// Collect the signals of the spike, sentiment and divergence processors
    ///
    /// `probability_history` must already hold `probability`. The spot price of
    /// the snapshot is pushed into `spot_history`.
    pub fn collect(
        probability: f64,
        probability_history: &RollingHistory<f64>,
        spot_history: &mut RollingHistory<f64>,
        snapshot: &MarketSnapshot,
        config: &StrategyConfig,
    ) -> Vec<Signal> {
        let spike = process_spike(probability, probability_history, &config.spike);
        let sentiment =
            process_sentiment(snapshot.sentiment.fear_greed, probability, &config.sentiment);
        let divergence =
            process_divergence(probability, snapshot.price, spot_history, &config.divergence);

        let signals: Vec<Signal> = [spike, sentiment, divergence].into_iter().flatten().collect();

        for signal in &signals {
            debug!(
                source = %signal.source,
                direction = %signal.direction,
                strength = signal.strength().value(),
                confidence = signal.confidence(),
                score = signal.score(),
                "Processor signal"
            );
        }

        signals
    }
}
