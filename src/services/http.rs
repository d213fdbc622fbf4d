//! Shared HTTP plumbing for the provider clients

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::services::error::ProviderError;

const USER_AGENT: &str = concat!("polywrath/", env!("CARGO_PKG_VERSION"));

pub fn build_client(timeout: Duration) -> Result<Client, ProviderError> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Decode a JSON body after checking the status code
pub async fn read_json<T: DeserializeOwned>(
    provider: &'static str,
    response: Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::decode(provider, e.to_string()))
}

/// Parse a decimal string field as returned by the exchange APIs
pub fn parse_decimal(provider: &'static str, field: &str, raw: &str) -> Result<f64, ProviderError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ProviderError::decode(provider, format!("{field} is not a number: {raw:?}")))
}

/// Like `parse_decimal`, but an absent or malformed field is `None`
pub fn parse_optional(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
