//! Environment-driven configuration
//!
//! Provider endpoints and runtime knobs come from the environment (a `.env`
//! file is loaded by the binaries). Processor thresholds default to the
//! tuned constants and can be overridden in code.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::history::{PROBABILITY_HISTORY_CAP, SPOT_HISTORY_CAP};
use crate::signals::divergence::DivergenceConfig;
use crate::signals::fusion::FusionOptions;
use crate::signals::sentiment::SentimentConfig;
use crate::signals::spike::SpikeConfig;

pub const DEFAULT_COINBASE_URL: &str = "https://api.exchange.coinbase.com";
pub const DEFAULT_BINANCE_URL: &str = "https://api.binance.com";
pub const DEFAULT_FEAR_GREED_URL: &str = "https://api.alternative.me";
pub const DEFAULT_SOLANA_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_CLOB_URL: &str = "https://clob.polymarket.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid url for {key}: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),
}

/// Current deployment environment (`APP_ENV`, then `ENVIRONMENT`, default "sandbox")
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .or_else(|_| env::var("ENVIRONMENT"))
        .unwrap_or_else(|_| "sandbox".to_string())
        .to_lowercase()
}

pub fn is_production() -> bool {
    matches!(get_environment().as_str(), "production" | "prod")
}

/// Read a base URL, validated and stripped of any trailing slash
fn read_url(key: &'static str, default: &str) -> Result<String, ConfigError> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { key, source })?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn read_parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Endpoints and fetch parameters of the external data sources
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub coinbase_url: String,
    pub binance_url: String,
    pub fear_greed_url: String,
    pub solana_rpc_url: String,
    pub clob_url: String,
    pub coinbase_product: String,
    pub binance_symbol: String,
    /// Per-provider fetch budget
    pub timeout: Duration,
    /// Trade window summarized by the flow provider
    pub flow_window_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            coinbase_url: DEFAULT_COINBASE_URL.to_string(),
            binance_url: DEFAULT_BINANCE_URL.to_string(),
            fear_greed_url: DEFAULT_FEAR_GREED_URL.to_string(),
            solana_rpc_url: DEFAULT_SOLANA_RPC_URL.to_string(),
            clob_url: DEFAULT_CLOB_URL.to_string(),
            coinbase_product: "BTC-USD".to_string(),
            binance_symbol: "BTCUSDT".to_string(),
            timeout: Duration::from_millis(5000),
            flow_window_seconds: 60,
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let timeout_ms: u64 = read_parsed("PROVIDER_TIMEOUT_MS", 5000)?;
        if timeout_ms == 0 {
            return Err(ConfigError::NonPositive("PROVIDER_TIMEOUT_MS"));
        }
        let flow_window_seconds: u64 = read_parsed("FLOW_WINDOW_SECONDS", 60)?;
        if flow_window_seconds == 0 {
            return Err(ConfigError::NonPositive("FLOW_WINDOW_SECONDS"));
        }

        Ok(Self {
            coinbase_url: read_url("COINBASE_API_URL", DEFAULT_COINBASE_URL)?,
            binance_url: read_url("BINANCE_API_URL", DEFAULT_BINANCE_URL)?,
            fear_greed_url: read_url("FEAR_GREED_API_URL", DEFAULT_FEAR_GREED_URL)?,
            solana_rpc_url: read_url("SOLANA_RPC_URL", DEFAULT_SOLANA_RPC_URL)?,
            clob_url: read_url("CLOB_API_URL", DEFAULT_CLOB_URL)?,
            coinbase_product: env::var("COINBASE_PRODUCT").unwrap_or_else(|_| "BTC-USD".into()),
            binance_symbol: env::var("BINANCE_SYMBOL").unwrap_or_else(|_| "BTCUSDT".into()),
            timeout: Duration::from_millis(timeout_ms),
            flow_window_seconds,
        })
    }
}

/// Thresholds of every processor plus the decision gates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub spike: SpikeConfig,
    pub sentiment: SentimentConfig,
    pub divergence: DivergenceConfig,
    pub fusion: FusionOptions,
    /// Minimum |imbalance| for opposing flow to veto a trade
    pub flow_veto_threshold: f64,
    pub probability_history_cap: usize,
    pub spot_history_cap: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            spike: SpikeConfig::default(),
            sentiment: SentimentConfig::default(),
            divergence: DivergenceConfig::default(),
            fusion: FusionOptions::default(),
            flow_veto_threshold: 0.1,
            probability_history_cap: PROBABILITY_HISTORY_CAP,
            spot_history_cap: SPOT_HISTORY_CAP,
        }
    }
}

/// Polling loop settings of the worker binary
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub eval_interval: Duration,
    pub market_token_id: Option<String>,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let seconds: u64 = read_parsed("EVAL_INTERVAL_SECONDS", 30)?;
        if seconds == 0 {
            return Err(ConfigError::NonPositive("EVAL_INTERVAL_SECONDS"));
        }
        let market_token_id = env::var("MARKET_TOKEN_ID")
            .ok()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        Ok(Self {
            eval_interval: Duration::from_secs(seconds),
            market_token_id,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    pub providers: ProviderConfig,
    pub strategy: StrategyConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: get_environment(),
            port: read_parsed("PORT", 8080)?,
            providers: ProviderConfig::from_env()?,
            strategy: StrategyConfig::default(),
        })
    }
}
