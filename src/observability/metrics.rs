//! Prometheus metrics endpoint and recording helpers.
//!
//! The exporter binds to localhost only; scrape it directly or proxy it.
//! Route labels always come from the matched route template, never the raw
//! request path, so label cardinality stays bounded.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Starts the Prometheus exporter on `127.0.0.1:port`.
///
/// Idempotent: only the first call installs the recorder.
pub fn init_metrics(port: u16) -> std::result::Result<(), String> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port);
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("failed to install metrics exporter on {addr}: {e}"))?;

    describe_metrics();
    tracing::info!(%addr, "metrics exporter listening");
    Ok(())
}

fn describe_metrics() {
    describe_counter!(
        "boxboard_http_requests_total",
        "HTTP requests served, by route template and status class"
    );
    describe_histogram!(
        "boxboard_http_request_duration_seconds",
        "HTTP request latency, by route template"
    );
    describe_counter!(
        "boxboard_refresh_total",
        "Leaderboard refresh attempts, by outcome"
    );
    describe_histogram!(
        "boxboard_refresh_duration_seconds",
        "Wall-clock time of a full leaderboard refresh"
    );
    describe_gauge!(
        "boxboard_entrants",
        "Entrants currently held in the store"
    );
    describe_gauge!("boxboard_scores", "Score rows currently held in the store");
    describe_counter!(
        "boxboard_upstream_pages_total",
        "Leaderboard API pages fetched, by division"
    );
    describe_gauge!("boxboard_sessions_active", "Live admin sessions");
}

/// Collapses a status code into a bounded label (`2xx`, `4xx`, ...).
fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Records one served HTTP request.
pub fn record_http_request(route: &str, status: u16, duration: Duration) {
    counter!(
        "boxboard_http_requests_total",
        "route" => route.to_owned(),
        "status" => status_class(status),
    )
    .increment(1);
    histogram!(
        "boxboard_http_request_duration_seconds",
        "route" => route.to_owned(),
    )
    .record(duration.as_secs_f64());
}

/// Records the outcome of a refresh run.
pub fn record_refresh(success: bool, duration: Duration) {
    let outcome = if success { "success" } else { "failure" };
    counter!("boxboard_refresh_total", "outcome" => outcome).increment(1);
    histogram!("boxboard_refresh_duration_seconds").record(duration.as_secs_f64());
}

/// Publishes the store population after a refresh.
pub fn record_store_size(entrants: usize, scores: usize) {
    // Precision loss only matters beyond 2^52 rows.
    #[allow(clippy::cast_precision_loss)]
    {
        gauge!("boxboard_entrants").set(entrants as f64);
        gauge!("boxboard_scores").set(scores as f64);
    }
}

/// Records one fetched leaderboard API page.
pub fn record_upstream_page(division: u16) {
    counter!("boxboard_upstream_pages_total", "division" => division.to_string()).increment(1);
}

/// Tracks admin session open/close.
pub fn record_session_delta(delta: i64) {
    #[allow(clippy::cast_precision_loss)]
    gauge!("boxboard_sessions_active").increment(delta as f64);
}
