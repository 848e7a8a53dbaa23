//! Command implementations

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Result;
use camino::Utf8Path;
use estimator_engine::{EstimationEngine, RunOutcome};
use estimator_llm::ReplayBackend;
use tracing::info;

use crate::Config;

const RULE: &str = "==================================================";

/// `estimator estimate`
pub async fn execute_estimate_command(config: &Config) -> Result<()> {
    info!(
        provider = config.provider(),
        model = config.model(),
        document = %config.document_path(),
        "Starting estimation"
    );
    let engine = EstimationEngine::from_config(config)?;
    let outcome = engine.run().await?;
    print!("{}", render_summary(&outcome));
    Ok(())
}

/// `estimator recover <RESPONSE_FILE>`
pub fn execute_recover_command(config: &Config, response_file: &Utf8Path) -> Result<()> {
    // The replay backend is never invoked; recovery works on the file directly.
    let engine = EstimationEngine::new(config, Arc::new(ReplayBackend::new(response_file)));
    let outcome = engine.recover_file(response_file)?;
    print!("{}", render_summary(&outcome));
    Ok(())
}

/// `estimator config`
pub fn execute_config_command(config: &Config) -> Result<()> {
    print!("{}", render_effective_config(config));
    Ok(())
}

pub(crate) fn render_effective_config(config: &Config) -> String {
    let entries = config.effective_config();
    let width = entries.keys().map(String::len).max().unwrap_or(0);

    let mut out = String::from("Effective configuration:\n");
    for (key, (value, source)) in &entries {
        let _ = writeln!(out, "  {key:<width$} = {value}  ({source})");
    }
    out
}

/// End-of-run summary printed to stdout.
pub(crate) fn render_summary(outcome: &RunOutcome) -> String {
    let estimation = &outcome.estimation;
    let doc = &estimation.document;
    let info = &doc.project_info;
    let summary = &doc.summary;

    let mut out = String::new();
    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "ESTIMATION SUMMARY");
    let _ = writeln!(out, "{RULE}");
    for (label, value) in [
        ("Title", &info.title),
        ("Project", &info.project_name),
        ("Client", &info.client),
        ("Date", &info.date),
        ("Version", &info.version),
        ("Prepared By", &info.prepared_by),
    ] {
        let shown = if value.is_empty() { "N/A" } else { value.as_str() };
        let _ = writeln!(out, "{label}: {shown}");
    }
    let _ = writeln!(
        out,
        "Total Hours: {} - {}",
        summary.total_min_hours, summary.total_max_hours
    );
    let _ = writeln!(out, "Duration: {} weeks", summary.estimated_duration_weeks);
    let _ = writeln!(out, "Team Size: {}", summary.recommended_team_size);
    let _ = writeln!(out, "Total Tasks: {}", summary.total_tasks);
    let _ = writeln!(out, "Total Phases: {}", summary.total_phases);

    if estimation.attempts > 1 {
        let _ = writeln!(out, "Attempts: {}", estimation.attempts);
    }
    if !estimation.repair_steps.is_empty() {
        let steps: Vec<String> = estimation.repair_steps.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "Repairs: {}", steps.join(", "));
    }
    if !estimation.issues.is_empty() {
        let _ = writeln!(out, "Fields corrected: {}", estimation.issues.len());
    }

    let _ = writeln!(out, "{RULE}");
    for artifact in &outcome.artifacts {
        let _ = writeln!(out, "✓ Wrote {} to {}", artifact.artifact.as_str(), artifact.path);
    }
    out
}
