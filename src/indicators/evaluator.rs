//! Point-based scoring of the indicator set into a LONG / SHORT call

use chrono::Utc;

use crate::indicators::error::IndicatorError;
use crate::indicators::momentum::{calculate_delta, calculate_macd, calculate_rsi_default};
use crate::indicators::trend::calculate_heiken_ashi;
use crate::indicators::volume::calculate_vwap;
use crate::models::indicators::{
    Candle, CandleTrend, HeikenAshiCandle, IndicatorSnapshot, MacdIndicator, Prediction, TaSignal,
};

/// Share (in percent) one side needs before the call leaves NEUTRAL
const DOMINANCE_PCT: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorScore {
    pub prediction: Prediction,
    pub signal: TaSignal,
    pub strength: f64,
}

/// Tally bull and bear points across the indicators
pub fn score_indicators(
    rsi: f64,
    macd: &MacdIndicator,
    heiken_ashi: &HeikenAshiCandle,
    delta_1: f64,
    delta_3: f64,
) -> IndicatorScore {
    let mut bull = 0u32;
    let mut bear = 0u32;

    if rsi < 30.0 {
        bull += 3;
    } else if rsi < 40.0 {
        bull += 1;
    } else if rsi > 70.0 {
        bear += 3;
    } else if rsi > 60.0 {
        bear += 1;
    }

    if macd.histogram > 0.0 {
        bull += 2;
    } else if macd.histogram < 0.0 {
        bear += 2;
    }

    match heiken_ashi.trend {
        CandleTrend::Bullish => bull += 2,
        CandleTrend::Bearish => bear += 2,
        CandleTrend::Neutral => {}
    }

    if delta_1 > 0.05 {
        bull += 1;
    } else if delta_1 < -0.05 {
        bear += 1;
    }
    if delta_3 > 0.1 {
        bull += 1;
    } else if delta_3 < -0.1 {
        bear += 1;
    }

    let total = bull + bear;
    // No votes is an even split, not a 0/100 SHORT call
    let long = if total == 0 {
        50.0
    } else {
        (bull as f64 / total as f64 * 100.0).round()
    };
    let short = 100.0 - long;

    let signal = if long > DOMINANCE_PCT {
        TaSignal::Long
    } else if short > DOMINANCE_PCT {
        TaSignal::Short
    } else {
        TaSignal::Neutral
    };

    IndicatorScore {
        prediction: Prediction { long, short },
        signal,
        strength: (long - short).abs(),
    }
}

fn validate(candles: &[Candle]) -> Result<(), IndicatorError> {
    if candles.is_empty() {
        return Err(IndicatorError::EmptySeries);
    }
    for (index, candle) in candles.iter().enumerate() {
        let fields = [
            ("open", candle.open),
            ("high", candle.high),
            ("low", candle.low),
            ("close", candle.close),
            ("volume", candle.volume),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(IndicatorError::InvalidValue { index, field });
        }
    }
    Ok(())
}

/// Run every indicator over the series and score the result
pub fn compute_indicators(candles: &[Candle]) -> Result<IndicatorSnapshot, IndicatorError> {
    validate(candles)?;

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let rsi = calculate_rsi_default(&closes);
    let macd = calculate_macd(&closes);
    let vwap = calculate_vwap(candles);
    let heiken_ashi = calculate_heiken_ashi(candles).ok_or(IndicatorError::EmptySeries)?;
    let delta_1 = calculate_delta(&closes, 1);
    let delta_3 = calculate_delta(&closes, 3);

    let score = score_indicators(rsi, &macd, &heiken_ashi, delta_1, delta_3);

    Ok(IndicatorSnapshot {
        rsi,
        macd,
        vwap,
        heiken_ashi,
        delta_1,
        delta_3,
        prediction: score.prediction,
        signal: score.signal,
        strength: score.strength,
        timestamp: Utc::now(),
    })
}
