//! Unit tests for VWAP

use crate::support::candle;
use polywrath::indicators::volume::calculate_vwap;

#[test]
fn test_vwap_weights_typical_price_by_volume() {
    let candles = [
        candle(10.0, 11.0, 9.0, 10.0, 1.0),
        candle(20.0, 22.0, 18.0, 20.0, 3.0),
    ];
    assert!((calculate_vwap(&candles) - 17.5).abs() < 1e-9);
}

#[test]
fn test_vwap_without_volume_is_zero() {
    let candles = [candle(10.0, 11.0, 9.0, 10.0, 0.0)];
    assert_eq!(calculate_vwap(&candles), 0.0);
    assert_eq!(calculate_vwap(&[]), 0.0);
}
