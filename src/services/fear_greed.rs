//! Crypto Fear & Greed index client

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::models::snapshot::SentimentSnapshot;
use crate::services::error::ProviderError;
use crate::services::http::{build_client, parse_decimal, read_json};
use crate::services::market_data::SentimentProvider;

const PROVIDER: &str = "fear_greed";

#[derive(Debug, Deserialize)]
struct IndexResponse {
    data: Vec<IndexEntry>,
}

#[derive(Debug, Deserialize)]
struct IndexEntry {
    value: String,
    value_classification: Option<String>,
}

pub struct FearGreedClient {
    client: Client,
    base_url: String,
}

impl FearGreedClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(config.timeout)?,
            base_url: config.fear_greed_url.clone(),
        })
    }
}

#[async_trait]
impl SentimentProvider for FearGreedClient {
    async fn fetch_sentiment(&self) -> Result<SentimentSnapshot, ProviderError> {
        let response = self
            .client
            .get(format!("{}/fng/", self.base_url))
            .query(&[("limit", "1"), ("format", "json")])
            .send()
            .await?;
        let body: IndexResponse = read_json(PROVIDER, response).await?;

        let latest = body
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::decode(PROVIDER, "empty index data"))?;

        Ok(SentimentSnapshot {
            value: parse_decimal(PROVIDER, "value", &latest.value)?,
            classification: latest.value_classification,
            timestamp: Utc::now(),
        })
    }
}
