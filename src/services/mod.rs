//! External data providers and their HTTP clients.

pub mod binance;
pub mod clob;
pub mod coinbase;
pub mod error;
pub mod fear_greed;
pub mod http;
pub mod market_data;
pub mod solana;

pub use binance::{summarize_trades, BinanceClient, RecentTrade, TradeSummary};
pub use clob::ClobClient;
pub use coinbase::CoinbaseClient;
pub use error::ProviderError;
pub use fear_greed::FearGreedClient;
pub use market_data::*;
pub use solana::SolanaRpcClient;
