//! Percent change of the close over a fixed number of candles

/// Percent change between the latest close and the close `n` candles back
///
/// Zero when fewer than `n + 1` closes exist or the past close is not positive.
pub fn calculate_delta(closes: &[f64], n: usize) -> f64 {
    if closes.len() < n + 1 {
        return 0.0;
    }
    let recent = closes[closes.len() - 1];
    let past = closes[closes.len() - 1 - n];
    if past > 0.0 {
        (recent - past) / past * 100.0
    } else {
        0.0
    }
}
