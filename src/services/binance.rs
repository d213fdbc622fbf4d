//! Binance ticker and recent-trade flow client

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::models::snapshot::FlowSnapshot;
use crate::services::error::ProviderError;
use crate::services::http::{build_client, parse_optional, read_json};
use crate::services::market_data::TradeFlowProvider;

const PROVIDER: &str = "binance";
const TRADE_LIMIT: &str = "100";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TickerResponse {
    last_price: Option<String>,
    volume: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTrade {
    pub price: String,
    pub qty: String,
    /// Buyer was the maker, so the aggressor sold
    pub is_buyer_maker: bool,
    /// Unix millis
    pub time: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TradeSummary {
    pub buy_volume: f64,
    pub sell_volume: f64,
    pub trade_count: usize,
    pub vwap: Option<f64>,
}

/// Aggregate the trades printed within `window_ms` of `now_ms`
///
/// Unparseable trades are ignored.
pub fn summarize_trades(trades: &[RecentTrade], now_ms: i64, window_ms: i64) -> TradeSummary {
    let mut summary = TradeSummary::default();
    let mut notional = 0.0;
    let mut size_total = 0.0;

    for trade in trades.iter().filter(|t| now_ms - t.time <= window_ms) {
        let (Some(price), Some(size)) = (
            parse_optional(Some(trade.price.as_str())),
            parse_optional(Some(trade.qty.as_str())),
        ) else {
            continue;
        };

        summary.trade_count += 1;
        notional += price * size;
        size_total += size;
        if trade.is_buyer_maker {
            summary.sell_volume += size;
        } else {
            summary.buy_volume += size;
        }
    }

    if size_total > 0.0 {
        summary.vwap = Some(notional / size_total);
    }
    summary
}

pub struct BinanceClient {
    client: Client,
    base_url: String,
    symbol: String,
    window_seconds: u64,
}

impl BinanceClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(config.timeout)?,
            base_url: config.binance_url.clone(),
            symbol: config.binance_symbol.clone(),
            window_seconds: config.flow_window_seconds,
        })
    }

    async fn ticker(&self) -> Result<TickerResponse, ProviderError> {
        let response = self
            .client
            .get(format!("{}/api/v3/ticker/24hr", self.base_url))
            .query(&[("symbol", self.symbol.as_str())])
            .send()
            .await?;
        read_json(PROVIDER, response).await
    }

    async fn trades(&self) -> Result<Vec<RecentTrade>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/api/v3/trades", self.base_url))
            .query(&[("symbol", self.symbol.as_str()), ("limit", TRADE_LIMIT)])
            .send()
            .await?;
        read_json(PROVIDER, response).await
    }
}

#[async_trait]
impl TradeFlowProvider for BinanceClient {
    async fn fetch_flow(&self) -> Result<FlowSnapshot, ProviderError> {
        let (ticker, trades) = tokio::try_join!(self.ticker(), self.trades())?;

        let now = Utc::now();
        let summary = summarize_trades(
            &trades,
            now.timestamp_millis(),
            self.window_seconds as i64 * 1000,
        );

        Ok(FlowSnapshot {
            last_price: parse_optional(ticker.last_price.as_deref()),
            volume_24h: parse_optional(ticker.volume.as_deref()),
            buy_volume: summary.buy_volume,
            sell_volume: summary.sell_volume,
            trade_count: summary.trade_count,
            vwap: summary.vwap,
            window_seconds: self.window_seconds,
            timestamp: now,
        })
    }
}
