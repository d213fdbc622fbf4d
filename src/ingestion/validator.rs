//! Derives the canonical snapshot from raw provider readings and validates it

use chrono::{DateTime, Utc};

use crate::models::snapshot::{
    FlowMetrics, InvalidationReason, MarketContext, MarketSnapshot, SentimentReading, SnapshotMeta,
};

/// Relative gap between the two exchanges above which the snapshot is rejected
pub const MAX_PRICE_DIVERGENCE: f64 = 0.02;
/// Fear & Greed value assumed when the index is unavailable
pub const NEUTRAL_FEAR_GREED: f64 = 50.0;

fn relative_gap(a: f64, b: f64) -> f64 {
    if !a.is_finite() || !b.is_finite() || a == 0.0 {
        return 0.0;
    }
    (a - b).abs() / a.abs()
}

/// Build the snapshot for one ingestion cycle as of `now`
pub fn build_snapshot(ctx: &MarketContext, now: DateTime<Utc>) -> MarketSnapshot {
    let spot = ctx.spot.as_ref();
    let flow = ctx.flow.as_ref();

    let price = spot
        .map(|s| s.price)
        .or_else(|| flow.and_then(|f| f.last_price))
        .filter(|p| p.is_finite());

    let spread = spot.and_then(|s| match (s.bid, s.ask) {
        (Some(bid), Some(ask)) if bid.is_finite() && ask.is_finite() => Some(ask - bid),
        _ => None,
    });

    let volume_24h = spot
        .and_then(|s| s.volume_24h)
        .or_else(|| flow.and_then(|f| f.volume_24h))
        .unwrap_or(0.0);

    let mut flow_metrics = FlowMetrics::default();
    if let Some(flow) = flow {
        let total = flow.buy_volume + flow.sell_volume;
        if total > 0.0 {
            flow_metrics.buy_sell_imbalance = (flow.buy_volume - flow.sell_volume) / total;
        }
        flow_metrics.vwap_delta = match (price, flow.vwap) {
            (Some(p), Some(vwap)) if p != 0.0 && vwap.is_finite() => Some((p - vwap) / p),
            _ => None,
        };
    }

    let sentiment = SentimentReading {
        fear_greed: ctx
            .sentiment
            .as_ref()
            .map(|s| s.value)
            .filter(|v| v.is_finite())
            .unwrap_or(NEUTRAL_FEAR_GREED),
    };

    let mut reasons = Vec::new();
    if price.is_none() {
        reasons.push(InvalidationReason::NoSpotPrice);
    }
    if let (Some(spot), Some(last)) = (spot, flow.and_then(|f| f.last_price)) {
        if relative_gap(spot.price, last) > MAX_PRICE_DIVERGENCE {
            reasons.push(InvalidationReason::PriceMismatch);
        }
    }
    if flow.is_some_and(|f| f.trade_count == 0) {
        reasons.push(InvalidationReason::NoRecentTrades);
    }

    let source_lag_ms = [
        spot.map(|s| s.timestamp),
        flow.map(|f| f.timestamp),
        ctx.sentiment.as_ref().map(|s| s.timestamp),
    ]
    .into_iter()
    .flatten()
    .map(|ts| (now - ts).num_milliseconds())
    .fold(0, i64::max);

    MarketSnapshot {
        price,
        spread,
        volume_24h,
        flow: flow_metrics,
        sentiment,
        chain_slot: ctx.chain.as_ref().map(|c| c.slot),
        meta: SnapshotMeta {
            timestamp: now,
            source_lag_ms,
            is_valid: reasons.is_empty(),
            reasons,
        },
    }
}
