//! Scanner configuration and risk profiles

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskLevel {
    /// Minimum indicator strength (0-100) for a market to be signalled
    pub fn signal_threshold(self) -> f64 {
        match self {
            RiskLevel::Conservative => 70.0,
            RiskLevel::Moderate => 55.0,
            RiskLevel::Aggressive => 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketToggles {
    pub btc: bool,
    pub eth: bool,
    pub sol: bool,
}

impl Default for MarketToggles {
    fn default() -> Self {
        Self {
            btc: true,
            eth: true,
            sol: true,
        }
    }
}

impl MarketToggles {
    /// Whether the asset named in a market question is enabled
    ///
    /// Questions naming none of the tracked assets are always allowed.
    pub fn allows(&self, question: &str) -> bool {
        let q = question.to_lowercase();
        if q.contains("btc") || q.contains("bitcoin") {
            self.btc
        } else if q.contains("eth") || q.contains("ethereum") {
            self.eth
        } else if q.contains("sol") || q.contains("solana") {
            self.sol
        } else {
            true
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub risk_level: RiskLevel,
    /// Position cap in USDC
    pub max_position_size: f64,
    pub markets: MarketToggles,
    pub auto_trade: bool,
    pub signal_threshold: f64,
}

impl AgentConfig {
    pub fn new(risk_level: RiskLevel) -> Self {
        Self {
            risk_level,
            max_position_size: 100.0,
            markets: MarketToggles::default(),
            auto_trade: false,
            signal_threshold: risk_level.signal_threshold(),
        }
    }

    /// Merge a partial update; a new risk level re-derives the threshold
    pub fn apply(&mut self, update: AgentConfigUpdate) {
        if let Some(max) = update.max_position_size {
            self.max_position_size = max;
        }
        if let Some(markets) = update.markets {
            self.markets = markets;
        }
        if let Some(auto_trade) = update.auto_trade {
            self.auto_trade = auto_trade;
        }
        if let Some(threshold) = update.signal_threshold {
            self.signal_threshold = threshold;
        }
        if let Some(risk_level) = update.risk_level {
            self.risk_level = risk_level;
            self.signal_threshold = risk_level.signal_threshold();
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(RiskLevel::Moderate)
    }
}

/// Partial update accepted by the config endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentConfigUpdate {
    pub risk_level: Option<RiskLevel>,
    pub max_position_size: Option<f64>,
    pub markets: Option<MarketToggles>,
    pub auto_trade: Option<bool>,
    pub signal_threshold: Option<f64>,
}
