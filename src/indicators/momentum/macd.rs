//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::models::indicators::MacdIndicator;

pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;
pub const MACD_SIGNAL_PERIOD: usize = 9;

/// Calculate MACD with the standard (12, 26, 9) periods
///
/// MACD = EMA(12) - EMA(26), both series seeded at the first close
/// Signal = EMA(9) over the last 9 MACD values
/// Histogram = MACD - Signal
///
/// Fewer than 26 closes yields an all-zero indicator.
pub fn calculate_macd(closes: &[f64]) -> MacdIndicator {
    if closes.len() < MACD_SLOW_PERIOD {
        return MacdIndicator::default();
    }

    let fast = math::ema_series(closes, MACD_FAST_PERIOD);
    let slow = math::ema_series(closes, MACD_SLOW_PERIOD);
    let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();

    let tail_start = macd_line.len().saturating_sub(MACD_SIGNAL_PERIOD);
    let signal_line = math::ema_series(&macd_line[tail_start..], MACD_SIGNAL_PERIOD);

    let value = macd_line.last().copied().unwrap_or(0.0);
    let signal = signal_line.last().copied().unwrap_or(0.0);

    MacdIndicator {
        value,
        signal,
        histogram: value - signal,
    }
}
