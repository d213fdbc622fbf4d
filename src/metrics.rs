//! Prometheus metrics registry

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: Gauge,
    pub decisions_total: IntCounterVec,
    pub evaluation_duration_seconds: Histogram,
    pub provider_failures_total: IntCounterVec,
    pub scan_signals_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight = Gauge::new(
            "http_requests_in_flight",
            "Number of HTTP requests currently being served",
        )?;
        let decisions_total = IntCounterVec::new(
            Opts::new("decisions_total", "Strategy decisions by outcome"),
            &["decision"],
        )?;
        let evaluation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "evaluation_duration_seconds",
                "Duration of one strategy evaluation cycle",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;
        let provider_failures_total = IntCounterVec::new(
            Opts::new(
                "provider_failures_total",
                "Failed or timed-out provider fetches",
            ),
            &["provider"],
        )?;
        let scan_signals_total = IntCounter::new(
            "scan_signals_total",
            "Market scan signals above the configured threshold",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(decisions_total.clone()))?;
        registry.register(Box::new(evaluation_duration_seconds.clone()))?;
        registry.register(Box::new(provider_failures_total.clone()))?;
        registry.register(Box::new(scan_signals_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            decisions_total,
            evaluation_duration_seconds,
            provider_failures_total,
            scan_signals_total,
        })
    }

    /// Render every registered metric in the text exposition format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
