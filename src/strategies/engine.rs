//! Strategy decision engine
//!
//! One evaluation feeds the probability, ingests the market, runs the
//! processors, fuses their output and gates the consensus behind flow
//! confirmation. The two rolling buffers are the only state carried
//! between evaluations.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::StrategyConfig;
use crate::history::RollingHistory;
use crate::ingestion::Ingestor;
use crate::metrics::Metrics;
use crate::models::decision::{Decision, TradeSide};
use crate::models::signal::Signal;
use crate::models::snapshot::MarketSnapshot;
use crate::signals::engine::SignalEngine;
use crate::signals::fusion::SignalFusion;
use crate::strategies::error::EngineError;

/// Rolling buffers owned by the engine across evaluations
#[derive(Debug, Clone)]
pub struct EngineState {
    pub probability_history: RollingHistory<f64>,
    pub spot_history: RollingHistory<f64>,
}

impl EngineState {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            probability_history: RollingHistory::new(config.probability_history_cap),
            spot_history: RollingHistory::new(config.spot_history_cap),
        }
    }
}

fn validate_probability(probability: f64) -> Result<(), EngineError> {
    if probability.is_finite() && (0.0..=1.0).contains(&probability) {
        Ok(())
    } else {
        Err(EngineError::InvalidProbability(probability))
    }
}

/// Turn processor output into a decision as of `now`
///
/// Covers every step after the processors ran: fusion, the actionability
/// gate and the flow veto.
pub fn decide(
    signals: Vec<Signal>,
    snapshot: MarketSnapshot,
    config: &StrategyConfig,
    now: DateTime<Utc>,
) -> Decision {
    if signals.is_empty() {
        return Decision::hold("No signals generated", None, signals, snapshot);
    }

    let Some(fused) = SignalFusion::fuse_at(&signals, &config.fusion, now) else {
        return Decision::hold(
            "Fusion did not produce actionable signal",
            None,
            signals,
            snapshot,
        );
    };

    if !fused.is_actionable {
        let reason = format!(
            "Signal not strong enough (score={:.1}, conf={:.0}%)",
            fused.score,
            fused.confidence * 100.0
        );
        return Decision::hold(reason, Some(fused), signals, snapshot);
    }

    let side = TradeSide::from_direction(fused.direction);
    let imbalance = snapshot.flow.buy_sell_imbalance;
    let flow_agrees = imbalance * side.sign() > 0.0;

    if !flow_agrees && imbalance.abs() > config.flow_veto_threshold {
        let reason = format!(
            "Flow disagreement (imbalance={:.1}% vs {})",
            imbalance * 100.0,
            side
        );
        return Decision::skip(reason, Some(fused), signals, snapshot);
    }

    Decision::trade(side, fused, signals, snapshot)
}

pub struct StrategyEngine {
    ingestor: Arc<Ingestor>,
    config: StrategyConfig,
    state: Mutex<EngineState>,
    metrics: Option<Arc<Metrics>>,
}

impl StrategyEngine {
    pub fn new(ingestor: Arc<Ingestor>, config: StrategyConfig) -> Self {
        let state = EngineState::new(&config);
        Self {
            ingestor,
            config,
            state: Mutex::new(state),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Copy of the current rolling buffers
    pub async fn state(&self) -> EngineState {
        self.state.lock().await.clone()
    }

    /// Append a probability reading to the rolling history
    pub async fn feed(&self, probability: f64) -> Result<(), EngineError> {
        validate_probability(probability)?;
        self.state.lock().await.probability_history.push(probability);
        Ok(())
    }

    /// Run one full evaluation cycle for the current UP probability
    pub async fn evaluate(&self, probability: f64) -> Result<Decision, EngineError> {
        let started = Instant::now();
        self.feed(probability).await?;

        // The lock is not held across the provider round trips.
        let snapshot = self.ingestor.ingest().await;

        let decision = if snapshot.is_valid() {
            let signals = {
                let mut state = self.state.lock().await;
                let EngineState {
                    probability_history,
                    spot_history,
                } = &mut *state;
                SignalEngine::collect(
                    probability,
                    probability_history,
                    spot_history,
                    &snapshot,
                    &self.config,
                )
            };
            decide(signals, snapshot, &self.config, Utc::now())
        } else {
            let reason = format!("Ingestion invalid: {}", snapshot.reasons_text());
            Decision::skip(reason, None, Vec::new(), snapshot)
        };

        let elapsed = started.elapsed();
        if let Some(metrics) = &self.metrics {
            let kind = decision.kind.to_string();
            metrics
                .decisions_total
                .with_label_values(&[kind.as_str()])
                .inc();
            metrics
                .evaluation_duration_seconds
                .observe(elapsed.as_secs_f64());
        }

        match &decision.fused {
            Some(fused) => info!(
                decision = %decision.kind,
                side = ?decision.side,
                reason = decision.reason.as_deref().unwrap_or(""),
                score = fused.score,
                confidence = fused.confidence,
                duration_ms = elapsed.as_millis() as u64,
                "Strategy decision"
            ),
            None => info!(
                decision = %decision.kind,
                reason = decision.reason.as_deref().unwrap_or(""),
                signals = decision.signals.len(),
                duration_ms = elapsed.as_millis() as u64,
                "Strategy decision"
            ),
        }
        Ok(decision)
    }
}
