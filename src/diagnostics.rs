// src/diagnostics.rs
//! Failure backstop: report once, leave a dump behind.

use chrono::{DateTime, Utc};
use std::path::Path;

use crate::pipeline::{NotificationStatus, PersistStatus, RunOutcome};

fn in_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").ok().as_deref() == Some("true")
}

/// Workflow-command data must not contain raw `%`, CR or LF.
pub fn escape_annotation(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub fn render_dump(err: &anyhow::Error, at: DateTime<Utc>) -> String {
    let mut out = format!("time: {}\nerror: {err}\n", at.to_rfc3339());
    for (i, cause) in err.chain().skip(1).enumerate() {
        out.push_str(&format!("cause {}: {cause}\n", i + 1));
    }
    out.push_str(&format!("\ndetail:\n{err:?}\n"));
    out
}

/// Log the failure, annotate the CI job, and write the dump file.
pub fn report_failure(err: &anyhow::Error, dump_path: &Path) {
    tracing::error!(error = %format!("{err:#}"), "run failed");
    if in_github_actions() {
        println!("::error::{}", escape_annotation(&format!("Script error: {err:#}")));
    }
    if let Err(e) = std::fs::write(dump_path, render_dump(err, Utc::now())) {
        tracing::error!(error = %e, path = %dump_path.display(), "could not write error dump");
    }
}

/// Surface non-fatal problems of a completed run.
pub fn report_outcome(outcome: &RunOutcome) {
    let RunOutcome::Completed(report) = outcome else {
        return;
    };
    let mut problems = Vec::new();
    match &report.notification {
        NotificationStatus::Failed(r) => problems.push(format!("Pushover notification failed: {r}")),
        NotificationStatus::Skipped(r) => problems.push(format!("Alert skipped: {r}")),
        _ => {}
    }
    if let PersistStatus::Failed(r) = &report.persistence {
        problems.push(format!("Last seen id not saved, state may be stale: {r}"));
    }
    for p in problems {
        tracing::warn!("{p}");
        if in_github_actions() {
            println!("::warning::{}", escape_annotation(&p));
        }
    }
}
