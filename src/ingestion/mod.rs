//! Concurrent provider ingestion.
//!
//! Every provider is fetched at once under its own timeout. A provider that
//! fails or times out is simply missing from the context; validation decides
//! what that means for the snapshot.

pub mod validator;

use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::metrics::Metrics;
use crate::models::snapshot::{MarketContext, MarketSnapshot};
use crate::services::error::ProviderError;
use crate::services::market_data::{
    ChainProbe, SentimentProvider, SpotPriceProvider, TradeFlowProvider,
};
use crate::services::{BinanceClient, CoinbaseClient, FearGreedClient, SolanaRpcClient};

pub use validator::build_snapshot;

pub struct Ingestor {
    spot: Arc<dyn SpotPriceProvider>,
    flow: Arc<dyn TradeFlowProvider>,
    sentiment: Arc<dyn SentimentProvider>,
    chain: Option<Arc<dyn ChainProbe>>,
    timeout: Duration,
    metrics: Option<Arc<Metrics>>,
}

impl Ingestor {
    pub fn new(
        spot: Arc<dyn SpotPriceProvider>,
        flow: Arc<dyn TradeFlowProvider>,
        sentiment: Arc<dyn SentimentProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            spot,
            flow,
            sentiment,
            chain: None,
            timeout,
            metrics: None,
        }
    }

    /// Wire the HTTP clients for every configured source
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let ingestor = Self::new(
            Arc::new(CoinbaseClient::new(config)?),
            Arc::new(BinanceClient::new(config)?),
            Arc::new(FearGreedClient::new(config)?),
            config.timeout,
        )
        .with_chain_probe(Arc::new(SolanaRpcClient::new(config)?));
        Ok(ingestor)
    }

    pub fn with_chain_probe(mut self, probe: Arc<dyn ChainProbe>) -> Self {
        self.chain = Some(probe);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Run one provider fetch under the timeout, absorbing any failure
    async fn guarded<T, F>(&self, provider: &'static str, fetch: F) -> Option<T>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        let error = match timeout(self.timeout, fetch).await {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(e)) => e,
            Err(_) => ProviderError::Timeout {
                provider,
                timeout_ms: self.timeout.as_millis() as u64,
            },
        };

        warn!(provider = provider, error = %error, "Provider fetch failed");
        if let Some(metrics) = &self.metrics {
            metrics
                .provider_failures_total
                .with_label_values(&[provider])
                .inc();
        }
        None
    }

    /// Fetch every source concurrently
    pub async fn fetch_context(&self) -> MarketContext {
        let chain = async {
            match &self.chain {
                Some(probe) => self.guarded("solana", probe.fetch_slot()).await,
                None => None,
            }
        };

        let (spot, flow, sentiment, chain) = tokio::join!(
            self.guarded("coinbase", self.spot.fetch_spot()),
            self.guarded("binance", self.flow.fetch_flow()),
            self.guarded("fear_greed", self.sentiment.fetch_sentiment()),
            chain,
        );

        MarketContext {
            spot,
            flow,
            sentiment,
            chain,
        }
    }

    /// Fetch, derive and validate one snapshot
    pub async fn ingest(&self) -> MarketSnapshot {
        let ctx = self.fetch_context().await;
        let snapshot = build_snapshot(&ctx, Utc::now());

        debug!(
            price = ?snapshot.price,
            imbalance = snapshot.flow.buy_sell_imbalance,
            fear_greed = snapshot.sentiment.fear_greed,
            source_lag_ms = snapshot.meta.source_lag_ms,
            is_valid = snapshot.meta.is_valid,
            "Ingested market snapshot"
        );

        snapshot
    }
}
