// src/telemetry.rs
//! Tracing subscriber setup and metric descriptions.

use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
const DEFAULT_LOG_FILTER: &str = "conclave_watch=info,warn";

/// Compact human logs by default; `LOG_FORMAT=json` for log shippers.
/// `RUST_LOG` overrides the filter.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var(ENV_LOG_FORMAT)
        .ok()
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

/// One-time metrics registration (so series carry descriptions).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_runs_total", "Pipeline runs started.");
        describe_counter!(
            "feed_classified_total",
            "Newest items classified, labelled by class."
        );
        describe_counter!(
            "feed_duplicates_total",
            "Runs that stopped because the newest item was already seen."
        );
        describe_counter!("notify_failures_total", "Alerts that failed to send.");
        describe_counter!(
            "store_failures_total",
            "Failed writes of the last seen id."
        );
    });
}

/// Install a Prometheus recorder so the run can print a metrics summary at exit.
pub fn install_prometheus() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;
    ensure_metrics_described();
    Ok(handle)
}
