//! Polywrath Worker
//!
//! Polls the market's UP probability on a fixed interval and runs one
//! strategy evaluation per tick. Decisions are logged; execution is left
//! to downstream consumers.

use dotenvy::dotenv;
use polywrath::config::{Config, WorkerConfig};
use polywrath::ingestion::Ingestor;
use polywrath::logging;
use polywrath::metrics::Metrics;
use polywrath::services::{ClobClient, ProbabilityFeed};
use polywrath::strategies::StrategyEngine;
use std::sync::Arc;
use tokio::signal;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = Config::from_env()?;
    let worker = WorkerConfig::from_env()?;
    info!("Starting Polywrath Worker");
    info!(environment = %config.environment, "Environment");

    let token_id = worker
        .market_token_id
        .ok_or("MARKET_TOKEN_ID must be set for worker")?;

    let metrics = Arc::new(Metrics::new()?);
    let ingestor = Ingestor::from_config(&config.providers)?.with_metrics(metrics.clone());
    let engine = StrategyEngine::new(Arc::new(ingestor), config.strategy.clone())
        .with_metrics(metrics.clone());
    let feed = ClobClient::new(&config.providers)?;

    info!(
        token_id = %token_id,
        interval_seconds = worker.eval_interval.as_secs(),
        "Evaluating every {} seconds",
        worker.eval_interval.as_secs()
    );

    let mut ticker = interval(worker.eval_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Shutting down worker...");
                break;
            }
            _ = ticker.tick() => {
                let probability = match feed.fetch_probability(&token_id).await {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(error = %e, "Failed to fetch market probability, skipping tick");
                        continue;
                    }
                };

                match engine.evaluate(probability).await {
                    Ok(decision) => info!(
                        probability,
                        decision = %decision.kind,
                        side = ?decision.side,
                        reason = decision.reason.as_deref().unwrap_or(""),
                        "Evaluation tick"
                    ),
                    Err(e) => error!(error = %e, probability, "Evaluation rejected"),
                }
            }
        }
    }

    info!("Worker stopped");
    Ok(())
}
