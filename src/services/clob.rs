//! Prediction-market order book client (public endpoints only)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::services::error::ProviderError;
use crate::services::http::{build_client, parse_decimal, read_json};
use crate::services::market_data::{PriceHistoryProvider, PricePoint, ProbabilityFeed};

const PROVIDER: &str = "clob";

#[derive(Debug, Deserialize)]
struct MidpointResponse {
    mid: String,
}

#[derive(Debug, Deserialize)]
struct PriceHistoryResponse {
    #[serde(default)]
    history: Vec<PricePoint>,
}

pub struct ClobClient {
    client: Client,
    base_url: String,
}

impl ClobClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(config.timeout)?,
            base_url: config.clob_url.clone(),
        })
    }
}

#[async_trait]
impl ProbabilityFeed for ClobClient {
    async fn fetch_probability(&self, token_id: &str) -> Result<f64, ProviderError> {
        let response = self
            .client
            .get(format!("{}/midpoint", self.base_url))
            .query(&[("token_id", token_id)])
            .send()
            .await?;
        let body: MidpointResponse = read_json(PROVIDER, response).await?;
        parse_decimal(PROVIDER, "mid", &body.mid)
    }
}

#[async_trait]
impl PriceHistoryProvider for ClobClient {
    async fn fetch_price_history(
        &self,
        token_id: &str,
        interval: &str,
        fidelity: u32,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        let fidelity = fidelity.to_string();
        let response = self
            .client
            .get(format!("{}/prices-history", self.base_url))
            .query(&[
                ("market", token_id),
                ("interval", interval),
                ("fidelity", fidelity.as_str()),
            ])
            .send()
            .await?;
        let body: PriceHistoryResponse = read_json(PROVIDER, response).await?;
        Ok(body.history)
    }
}
