// src/metrics.rs
use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;
use std::net::SocketAddr;

/// One-time metrics registration (so series show up on the scrape endpoint).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("checker_cycles_total", "Poll cycles started.");
        describe_counter!(
            "checker_fetch_errors_total",
            "Search requests that failed or could not be decoded."
        );
        describe_counter!("checker_notifications_total", "Notifications delivered.");
        describe_counter!(
            "checker_notify_errors_total",
            "Notification requests that failed."
        );
        describe_counter!(
            "checker_new_sites_total",
            "Nearby sites not seen on the previous cycle."
        );
        describe_gauge!("checker_sites_nearby", "Sites found within the radius last cycle.");
        describe_gauge!(
            "checker_sites_available",
            "Sites with eligible availability last cycle."
        );
        describe_gauge!("checker_sites_total", "Sites returned by the last search.");
        describe_gauge!("checker_last_run_ts", "Unix ts when the last cycle finished.");
        describe_histogram!("checker_fetch_ms", "Search request time in milliseconds.");
    });
}

/// Install the Prometheus recorder with its own HTTP listener on `addr`.
/// Must be called from inside the Tokio runtime.
pub fn install_exporter(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .with_context(|| format!("prometheus: install exporter on {addr}"))?;
    ensure_described();
    tracing::info!(%addr, "serving metrics");
    Ok(())
}
