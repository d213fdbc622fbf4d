//! Technical-indicator scan over prediction markets
//!
//! Each market's UP token price history is turned into synthetic candles and
//! scored by the indicator engine. Markets whose call is strong enough become
//! ranked trade suggestions; placing orders is left to the caller.

pub mod config;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::common::math::round_to;
use crate::history::{RollingHistory, CANDLE_SERIES_CAP};
use crate::indicators::compute_indicators;
use crate::metrics::Metrics;
use crate::models::indicators::{Candle, IndicatorSnapshot, TaSignal};
use crate::services::market_data::{PriceHistoryProvider, PricePoint};

pub use config::{AgentConfig, AgentConfigUpdate, MarketToggles, RiskLevel};

pub const HISTORY_INTERVAL: &str = "1m";
pub const HISTORY_FIDELITY: u32 = 60;
/// Fewer points than this cannot feed the 14-period RSI
pub const MIN_HISTORY_POINTS: usize = 14;
const SYNTHETIC_VOLUME: f64 = 1000.0;
const SYNTHETIC_RANGE: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketToken {
    pub token_id: String,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub price: f64,
}

/// A candidate market; the first token is UP, the second DOWN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMarket {
    pub question: String,
    #[serde(default)]
    pub slug: String,
    pub tokens: Vec<MarketToken>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanSide {
    BuyUp,
    BuyDown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSignal {
    pub market: String,
    pub slug: String,
    pub token_id: String,
    pub side: ScanSide,
    pub price: f64,
    pub signal: TaSignal,
    pub strength: f64,
    pub indicators: IndicatorSnapshot,
    pub suggested_size: f64,
}

/// Synthetic candles from a token price series
///
/// Each candle opens at the previous point, spans ±0.1% around the price
/// and carries a flat volume. Only the newest `CANDLE_SERIES_CAP` are kept.
pub fn points_to_candles(points: &[PricePoint]) -> Vec<Candle> {
    let mut series = RollingHistory::new(CANDLE_SERIES_CAP);
    let mut previous: Option<f64> = None;

    for point in points {
        let timestamp = DateTime::from_timestamp(point.t, 0).unwrap_or_else(Utc::now);
        series.push(Candle::new(
            previous.unwrap_or(point.p),
            point.p * (1.0 + SYNTHETIC_RANGE),
            point.p * (1.0 - SYNTHETIC_RANGE),
            point.p,
            SYNTHETIC_VOLUME,
            timestamp,
        ));
        previous = Some(point.p);
    }

    series.to_vec()
}

/// Position size scaled by strength, capped at the maximum, rounded to cents
pub fn suggested_size(max_position_size: f64, strength: f64) -> f64 {
    round_to((max_position_size * strength / 100.0).min(max_position_size), 2)
}

pub struct MarketScanner {
    history: Arc<dyn PriceHistoryProvider>,
    config: RwLock<AgentConfig>,
    metrics: Option<Arc<Metrics>>,
}

impl MarketScanner {
    pub fn new(history: Arc<dyn PriceHistoryProvider>, config: AgentConfig) -> Self {
        Self {
            history,
            config: RwLock::new(config),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn config(&self) -> AgentConfig {
        self.config.read().await.clone()
    }

    pub async fn update_config(&self, update: AgentConfigUpdate) -> AgentConfig {
        let mut config = self.config.write().await;
        config.apply(update);
        info!(
            risk_level = ?config.risk_level,
            signal_threshold = config.signal_threshold,
            "Scanner configuration updated"
        );
        config.clone()
    }

    async fn scan_market(&self, market: &ScanMarket, config: &AgentConfig) -> Option<ScanSignal> {
        let (up, down) = match market.tokens.as_slice() {
            [up, down, ..] => (up, down),
            _ => return None,
        };
        if !config.markets.allows(&market.question) {
            return None;
        }

        let points = match self
            .history
            .fetch_price_history(&up.token_id, HISTORY_INTERVAL, HISTORY_FIDELITY)
            .await
        {
            Ok(points) => points,
            Err(e) => {
                warn!(market = %market.slug, error = %e, "Skipping market, price history unavailable");
                return None;
            }
        };
        if points.len() < MIN_HISTORY_POINTS {
            debug!(market = %market.slug, points = points.len(), "Not enough price history");
            return None;
        }

        let indicators = match compute_indicators(&points_to_candles(&points)) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(market = %market.slug, error = %e, "Skipping market, indicators failed");
                return None;
            }
        };

        if indicators.strength < config.signal_threshold {
            return None;
        }
        let (side, token) = match indicators.signal {
            TaSignal::Long => (ScanSide::BuyUp, up),
            TaSignal::Short => (ScanSide::BuyDown, down),
            TaSignal::Neutral => return None,
        };

        Some(ScanSignal {
            market: market.question.clone(),
            slug: market.slug.clone(),
            token_id: token.token_id.clone(),
            side,
            price: token.price,
            signal: indicators.signal,
            strength: indicators.strength,
            suggested_size: suggested_size(config.max_position_size, indicators.strength),
            indicators,
        })
    }

    /// Score every market and rank the actionable ones by strength
    pub async fn scan(&self, markets: &[ScanMarket]) -> Vec<ScanSignal> {
        let config = self.config().await;
        let mut signals = Vec::new();

        for market in markets {
            if let Some(signal) = self.scan_market(market, &config).await {
                signals.push(signal);
            }
        }

        signals.sort_by(|a, b| b.strength.total_cmp(&a.strength));

        if let Some(metrics) = &self.metrics {
            metrics.scan_signals_total.inc_by(signals.len() as u64);
        }
        info!(
            markets = markets.len(),
            signals = signals.len(),
            "Market scan complete"
        );

        signals
    }
}
