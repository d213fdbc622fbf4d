//! RSI (Relative Strength Index) indicator

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Calculate RSI over the trailing `period` close-to-close changes
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// Returns the neutral 50 when fewer than `period + 1` closes are available
/// and 100 when the window holds no losses.
pub fn calculate_rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return 50.0;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in closes.len() - period..closes.len() {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(closes: &[f64]) -> f64 {
    calculate_rsi(closes, DEFAULT_RSI_PERIOD)
}
