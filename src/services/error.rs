use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{provider} returned status {status}")]
    Status { provider: &'static str, status: u16 },
    #[error("failed to decode {provider} response: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },
    #[error("{provider} timed out after {timeout_ms}ms")]
    Timeout {
        provider: &'static str,
        timeout_ms: u64,
    },
}

impl ProviderError {
    pub fn decode(provider: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Decode {
            provider,
            message: message.into(),
        }
    }
}
