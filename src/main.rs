//! conclave-watch — single-shot entrypoint.
//! Intended to run from a scheduler (cron, CI workflow): one feed snapshot per
//! invocation, non-zero exit status on failure.

use anyhow::{anyhow, Context};
use std::process::ExitCode;

use conclave_watch::config::{error_dump_path_from_env, AppConfig};
use conclave_watch::pipeline::{Pipeline, RunOutcome};
use conclave_watch::{diagnostics, telemetry};

async fn run() -> anyhow::Result<RunOutcome> {
    let cfg = AppConfig::from_env().context("loading configuration")?;
    let metrics = if cfg.metrics_summary {
        Some(telemetry::install_prometheus()?)
    } else {
        None
    };

    let pipeline = Pipeline::from_config(&cfg)?;
    let outcome = tokio::spawn(async move { pipeline.run_once().await })
        .await
        .map_err(|e| {
            if e.is_panic() {
                anyhow!("pipeline panicked: {e}")
            } else {
                anyhow!("pipeline task aborted: {e}")
            }
        })??;

    if let Some(handle) = metrics {
        tracing::info!(target: "metrics", "\n{}", handle.render());
    }
    Ok(outcome)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    match run().await {
        Ok(outcome) => {
            diagnostics::report_outcome(&outcome);
            if let Ok(json) = serde_json::to_string(&outcome) {
                tracing::debug!(outcome = %json, "run finished");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            diagnostics::report_failure(&err, &error_dump_path_from_env());
            ExitCode::FAILURE
        }
    }
}
