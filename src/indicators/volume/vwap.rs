use crate::models::indicators::Candle;

/// Volume-weighted average of the typical price (h + l + c) / 3
///
/// Zero when the series carries no volume.
pub fn calculate_vwap(candles: &[Candle]) -> f64 {
    let (weighted, volume) = candles.iter().fold((0.0, 0.0), |(tp, vol), c| {
        (tp + c.typical_price() * c.volume, vol + c.volume)
    });

    if volume > 0.0 {
        weighted / volume
    } else {
        0.0
    }
}
