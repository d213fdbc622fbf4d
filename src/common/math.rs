//! Rolling-window math used by the processors and indicators

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Simple moving average over the last `period` values
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    mean(&values[values.len() - period..])
}

/// Smoothing factor for an EMA of the given period
pub fn ema_multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Next EMA value from the previous one
pub fn ema_from_previous(value: f64, previous: f64, period: usize) -> f64 {
    let k = ema_multiplier(period);
    value * k + previous * (1.0 - k)
}

/// Full EMA series seeded with the first value
///
/// The output has the same length as the input.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return result;
    };
    result.push(first);
    for &value in &values[1..] {
        let previous = result[result.len() - 1];
        result.push(ema_from_previous(value, previous, period));
    }
    result
}

/// Relative change from `base` to `current`, 0 when the base is not positive
pub fn relative_change(current: f64, base: f64) -> f64 {
    if base > 0.0 {
        (current - base) / base
    } else {
        0.0
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
