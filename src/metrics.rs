//! Prometheus metrics: HTTP request instrumentation plus business counters
//! for the roster and the adjustment pipeline.
//!
//! The exporter listens on its own port so the scrape target never shares a
//! listener with the API. Setting `OBSERVABILITY_ENABLED=false` turns the
//! whole module into a no-op.

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Enabled unless `OBSERVABILITY_ENABLED` is set to `false` or `0`.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

/// Installs the Prometheus recorder and starts its upkeep task.
///
/// Returns `None` when observability is disabled.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5,
                10.0,
            ],
        )
        .expect("Failed to set buckets")
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    // Upkeep drains stale histogram samples
    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Some(handle)
}

fn status_class(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Records a counter, duration histogram, and active-request gauge for
/// every request, labeled by the matched route rather than the raw path.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    gauge!("http_requests_active").increment(1.0);
    let started = Instant::now();

    let response = next.run(req).await;

    let elapsed = started.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(elapsed);
    counter!("http_requests_by_status", "status_category" => status_class(status)).increment(1);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router for the metrics listener.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics helpers

pub fn track_person_created(identity: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("people_created_total", "identity" => identity.to_string()).increment(1);
}

pub fn track_person_deleted() {
    if !is_observability_enabled() {
        return;
    }
    counter!("people_deleted_total").increment(1);
}

/// Record a committed adjustment batch.
pub fn track_scores_adjusted(adjustment_type: &str, batch_size: usize) {
    if !is_observability_enabled() {
        return;
    }
    counter!("score_adjustments_total", "type" => adjustment_type.to_string())
        .increment(batch_size as u64);
    counter!("score_adjustment_batches_total", "type" => adjustment_type.to_string()).increment(1);
}

pub fn track_adjustment_rejected(reason: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("score_adjustments_rejected_total", "reason" => reason.to_string()).increment(1);
}

pub fn set_roster_size(count: i64) {
    if !is_observability_enabled() {
        return;
    }
    gauge!("roster_people_total").set(count as f64);
}
