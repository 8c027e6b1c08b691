//! Prometheus metrics for the engine and its HTTP surface.

use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,

    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,

    pub evaluations_total: IntCounter,
    /// Labeled by gate tag, e.g. "liquidity_below_min".
    pub hard_fails_total: IntCounterVec,
    /// Labeled by final intent.
    pub decisions_total: IntCounterVec,
    /// Labeled by outcome: ok, unavailable, saturated.
    pub advisory_requests_total: IntCounterVec,
    pub advisory_in_flight: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounter::with_opts(Opts::new(
            "http_requests_total",
            "Total HTTP requests handled",
        ))?;
        let http_requests_in_flight = IntGauge::with_opts(Opts::new(
            "http_requests_in_flight",
            "HTTP requests currently being handled",
        ))?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;

        let evaluations_total = IntCounter::with_opts(Opts::new(
            "evaluations_total",
            "Coins evaluated through the gating/scoring engine",
        ))?;
        let hard_fails_total = IntCounterVec::new(
            Opts::new("hard_fails_total", "Hard-gate failures by gate tag"),
            &["gate"],
        )?;
        let decisions_total = IntCounterVec::new(
            Opts::new("decisions_total", "Decisions by final intent"),
            &["intent"],
        )?;
        let advisory_requests_total = IntCounterVec::new(
            Opts::new("advisory_requests_total", "Advisory dispatches by outcome"),
            &["outcome"],
        )?;
        let advisory_in_flight = IntGauge::with_opts(Opts::new(
            "advisory_in_flight",
            "Advisory calls currently in flight across the pool",
        ))?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(evaluations_total.clone()))?;
        registry.register(Box::new(hard_fails_total.clone()))?;
        registry.register(Box::new(decisions_total.clone()))?;
        registry.register(Box::new(advisory_requests_total.clone()))?;
        registry.register(Box::new(advisory_in_flight.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            evaluations_total,
            hard_fails_total,
            decisions_total,
            advisory_requests_total,
            advisory_in_flight,
        })
    }

    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = String::new();
        TextEncoder::new().encode_utf8(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }
}
