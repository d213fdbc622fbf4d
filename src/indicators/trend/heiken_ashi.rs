//! Heiken-Ashi candle of the latest bar

use crate::models::indicators::{Candle, CandleTrend, HeikenAshiCandle};

/// Smoothed candle built from the last two bars
///
/// close = (o + h + l + c) / 4 of the current bar
/// open  = (o + c) / 2 of the previous bar
///
/// A single bar is returned unchanged with a neutral trend.
pub fn calculate_heiken_ashi(candles: &[Candle]) -> Option<HeikenAshiCandle> {
    let (current, previous) = match candles {
        [] => return None,
        [only] => {
            return Some(HeikenAshiCandle {
                open: only.open,
                high: only.high,
                low: only.low,
                close: only.close,
                trend: CandleTrend::Neutral,
            })
        }
        [.., previous, current] => (current, previous),
    };

    let close = (current.open + current.high + current.low + current.close) / 4.0;
    let open = (previous.open + previous.close) / 2.0;
    let high = current.high.max(open).max(close);
    let low = current.low.min(open).min(close);

    let trend = if close > open {
        CandleTrend::Bullish
    } else if close < open {
        CandleTrend::Bearish
    } else {
        CandleTrend::Neutral
    };

    Some(HeikenAshiCandle {
        open,
        high,
        low,
        close,
        trend,
    })
}
