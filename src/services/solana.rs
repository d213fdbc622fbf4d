//! Solana JSON-RPC slot probe

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::ProviderConfig;
use crate::models::snapshot::ChainSnapshot;
use crate::services::error::ProviderError;
use crate::services::http::{build_client, read_json};
use crate::services::market_data::ChainProbe;

const PROVIDER: &str = "solana";

#[derive(Debug, Deserialize)]
struct RpcError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<u64>,
    error: Option<RpcError>,
}

pub struct SolanaRpcClient {
    client: Client,
    rpc_url: String,
}

impl SolanaRpcClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(config.timeout)?,
            rpc_url: config.solana_rpc_url.clone(),
        })
    }
}

#[async_trait]
impl ChainProbe for SolanaRpcClient {
    async fn fetch_slot(&self) -> Result<ChainSnapshot, ProviderError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getSlot",
            "params": [],
        });
        let response = self.client.post(&self.rpc_url).json(&body).send().await?;
        let rpc: RpcResponse = read_json(PROVIDER, response).await?;

        if let Some(error) = rpc.error {
            return Err(ProviderError::decode(PROVIDER, error.message));
        }
        let slot = rpc
            .result
            .ok_or_else(|| ProviderError::decode(PROVIDER, "missing result"))?;

        Ok(ChainSnapshot {
            slot,
            timestamp: Utc::now(),
        })
    }
}
