//! Prometheus counters for the recommendation paths.
//!
//! Counters are observational only; nothing in the request path reads them back.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    static ref OFFLINE_PERSONAL_HITS: IntCounter = register_int_counter!(
        "recommendation_offline_personal_hits_total",
        "Offline lookups served from a personal ranked list"
    )
    .expect("Failed to register recommendation_offline_personal_hits_total");

    static ref OFFLINE_DEFAULT_HITS: IntCounter = register_int_counter!(
        "recommendation_offline_default_hits_total",
        "Offline lookups served from the default ranked list"
    )
    .expect("Failed to register recommendation_offline_default_hits_total");

    static ref ONLINE_SOURCE_FAILURES: IntCounterVec = register_int_counter_vec!(
        "recommendation_online_source_failures_total",
        "Online collaborator calls that failed or timed out",
        &["stage"]
    )
    .expect("Failed to register recommendation_online_source_failures_total");

    static ref REQUESTS: IntCounterVec = register_int_counter_vec!(
        "recommendation_requests_total",
        "Recommendation requests by endpoint",
        &["endpoint"]
    )
    .expect("Failed to register recommendation_requests_total");
}

/// Source of an offline lookup result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflineHit {
    Personal,
    Default,
}

/// Stage of the online path that degraded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnlineStage {
    History,
    Similarity,
}

impl OnlineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnlineStage::History => "history",
            OnlineStage::Similarity => "similarity",
        }
    }
}

pub fn record_offline_hit(hit: OfflineHit) {
    match hit {
        OfflineHit::Personal => OFFLINE_PERSONAL_HITS.inc(),
        OfflineHit::Default => OFFLINE_DEFAULT_HITS.inc(),
    }
}

pub fn record_online_failure(stage: OnlineStage) {
    ONLINE_SOURCE_FAILURES
        .with_label_values(&[stage.as_str()])
        .inc();
}

pub fn record_request(endpoint: &str) {
    REQUESTS.with_label_values(&[endpoint]).inc();
}

/// GET /metrics
pub async fn metrics_handler() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
