//! Prometheus metrics for fan-out passes.
//!
//! Collectors are created lazily and registered into [`REGISTRY`] on first
//! use of [`gather`]. The engine never exposes an HTTP endpoint; hosts scrape
//! through `gather`.


use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::exponential_buckets;
use prometheus::Encoder;
use prometheus::Histogram;
use prometheus::HistogramOpts;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;
use tracing::error;

lazy_static! {
    pub static ref FETCH_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("track_fetch_total", "Search-source calls by outcome"),
        &["outcome"]
    )
    .expect("metric can not be created");

    pub static ref RENDER_FALLBACK_TOTAL: IntCounter = IntCounter::new(
        "track_render_fallback_total",
        "Notifications delivered plain-only after rich markup failed validation"
    )
    .expect("metric can not be created");

    pub static ref MESSAGES_DELIVERED_TOTAL: IntCounter = IntCounter::new(
        "track_messages_delivered_total",
        "Notifications handed to the delivery collaborator"
    )
    .expect("metric can not be created");

    pub static ref DELIVERY_FAILURES_TOTAL: IntCounter = IntCounter::new(
        "track_delivery_failures_total",
        "Notifications the delivery collaborator rejected or timed out on"
    )
    .expect("metric can not be created");

    pub static ref PASS_DURATION_MS: Histogram = Histogram::with_opts(
        HistogramOpts::new("track_pass_duration_ms", "Fan-out pass duration in ms")
            .buckets(exponential_buckets(1.0, 2.0, 16).expect("valid buckets"))
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

static REGISTER: Once = Once::new();

fn register_custom_metrics() {
    REGISTRY
        .register(Box::new(FETCH_TOTAL.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(RENDER_FALLBACK_TOTAL.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(MESSAGES_DELIVERED_TOTAL.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(DELIVERY_FAILURES_TOTAL.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(PASS_DURATION_MS.clone()))
        .expect("collector can be registered");
}

/// Text exposition of every engine metric.
pub fn gather() -> String {
    REGISTER.call_once(register_custom_metrics);

    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer) {
        error!("could not encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
