//! Coinbase Exchange spot quote client

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::models::snapshot::SpotSnapshot;
use crate::services::error::ProviderError;
use crate::services::http::{build_client, parse_decimal, parse_optional, read_json};
use crate::services::market_data::SpotPriceProvider;

const PROVIDER: &str = "coinbase";

#[derive(Debug, Deserialize)]
struct TickerResponse {
    price: String,
    bid: Option<String>,
    ask: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    volume: Option<String>,
    high: Option<String>,
    low: Option<String>,
}

pub struct CoinbaseClient {
    client: Client,
    base_url: String,
    product: String,
}

impl CoinbaseClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(config.timeout)?,
            base_url: config.coinbase_url.clone(),
            product: config.coinbase_product.clone(),
        })
    }

    async fn ticker(&self) -> Result<TickerResponse, ProviderError> {
        let url = format!("{}/products/{}/ticker", self.base_url, self.product);
        let response = self.client.get(url).send().await?;
        read_json(PROVIDER, response).await
    }

    async fn stats(&self) -> Result<StatsResponse, ProviderError> {
        let url = format!("{}/products/{}/stats", self.base_url, self.product);
        let response = self.client.get(url).send().await?;
        read_json(PROVIDER, response).await
    }
}

#[async_trait]
impl SpotPriceProvider for CoinbaseClient {
    async fn fetch_spot(&self) -> Result<SpotSnapshot, ProviderError> {
        let (ticker, stats) = tokio::try_join!(self.ticker(), self.stats())?;

        Ok(SpotSnapshot {
            price: parse_decimal(PROVIDER, "price", &ticker.price)?,
            bid: parse_optional(ticker.bid.as_deref()),
            ask: parse_optional(ticker.ask.as_deref()),
            volume_24h: parse_optional(stats.volume.as_deref()),
            high_24h: parse_optional(stats.high.as_deref()),
            low_24h: parse_optional(stats.low.as_deref()),
            timestamp: Utc::now(),
        })
    }
}
