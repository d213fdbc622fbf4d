//! Provider interfaces for the external data sources.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::snapshot::{ChainSnapshot, FlowSnapshot, SentimentSnapshot, SpotSnapshot};
use crate::services::error::ProviderError;

/// Spot quote of the asset (primary exchange)
#[async_trait]
pub trait SpotPriceProvider: Send + Sync {
    async fn fetch_spot(&self) -> Result<SpotSnapshot, ProviderError>;
}

/// Short-window trade flow of the asset (secondary exchange)
#[async_trait]
pub trait TradeFlowProvider: Send + Sync {
    async fn fetch_flow(&self) -> Result<FlowSnapshot, ProviderError>;
}

#[async_trait]
pub trait SentimentProvider: Send + Sync {
    async fn fetch_sentiment(&self) -> Result<SentimentSnapshot, ProviderError>;
}

/// Chain liveness probe
#[async_trait]
pub trait ChainProbe: Send + Sync {
    async fn fetch_slot(&self) -> Result<ChainSnapshot, ProviderError>;
}

/// Current UP probability of a prediction-market outcome token
#[async_trait]
pub trait ProbabilityFeed: Send + Sync {
    async fn fetch_probability(&self, token_id: &str) -> Result<f64, ProviderError>;
}

/// One point of an outcome token's price series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix seconds
    pub t: i64,
    pub p: f64,
}

#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    async fn fetch_price_history(
        &self,
        token_id: &str,
        interval: &str,
        fidelity: u32,
    ) -> Result<Vec<PricePoint>, ProviderError>;
}
