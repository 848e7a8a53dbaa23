//! Structured logging for the estimation pipeline
//!
//! Logs go to stderr so the end-of-run summary on stdout stays clean.
//! `RUST_LOG` overrides the default filters.

use std::time::{Duration, Instant};

use tracing::{Level, error, info, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::redaction::redact_secrets;
use crate::types::Stage;

/// Initialize the tracing subscriber.
///
/// Default filter is `estimator=info,warn`; verbose switches to
/// `estimator=debug,info`, prints targets, and reports span close timings.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("estimator=debug,info")
            } else {
                EnvFilter::try_new("estimator=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Span covering one pipeline stage of one attempt.
pub fn stage_span(stage: Stage, attempt: u32) -> tracing::Span {
    span!(
        Level::INFO,
        "stage",
        stage = %stage,
        attempt = attempt,
    )
}

pub fn log_stage_start(stage: Stage, attempt: u32) {
    info!(stage = %stage, attempt = attempt, "Starting stage");
}

pub fn log_stage_complete(stage: Stage, duration: Duration) {
    info!(
        stage = %stage,
        duration_ms = %duration.as_millis(),
        "Stage completed"
    );
}

/// Error text is redacted before it reaches the subscriber.
pub fn log_stage_error(stage: Stage, err: &str, duration: Duration) {
    let sanitized = redact_secrets(err);
    error!(
        stage = %stage,
        error = %sanitized,
        duration_ms = %duration.as_millis(),
        "Stage failed"
    );
}

/// Wall-clock timings per stage, in completion order.
#[derive(Debug, Default)]
pub struct StageTimings {
    entries: Vec<(Stage, Duration)>,
}

impl StageTimings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time `f`, record the duration under `stage`, and log completion.
    pub fn measure<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let out = f();
        self.record(stage, started.elapsed());
        out
    }

    pub fn record(&mut self, stage: Stage, duration: Duration) {
        log_stage_complete(stage, duration);
        self.entries.push((stage, duration));
    }

    #[must_use]
    pub fn entries(&self) -> &[(Stage, Duration)] {
        &self.entries
    }

    /// Sum of all durations recorded for `stage` (multiple attempts add up).
    #[must_use]
    pub fn total_for(&self, stage: Stage) -> Duration {
        self.entries
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, d)| *d)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_timings_accumulate() {
        let mut timings = StageTimings::new();
        timings.record(Stage::Model, Duration::from_millis(10));
        timings.record(Stage::Repair, Duration::from_millis(1));
        timings.record(Stage::Model, Duration::from_millis(15));

        assert_eq!(timings.entries().len(), 3);
        assert_eq!(timings.total_for(Stage::Model), Duration::from_millis(25));
        assert_eq!(timings.total_for(Stage::Report), Duration::ZERO);
    }

    #[test]
    fn test_measure_returns_closure_value() {
        let mut timings = StageTimings::new();
        let value = timings.measure(Stage::Normalize, || 42);
        assert_eq!(value, 42);
        assert_eq!(timings.entries()[0].0, Stage::Normalize);
    }

    #[test]
    fn test_stage_span_can_be_entered() {
        let span = stage_span(Stage::Validate, 1);
        let _guard = span.enter();
        log_stage_start(Stage::Validate, 1);
        log_stage_error(Stage::Validate, "token gsk_abcdefghijklmnopqrstuv", Duration::ZERO);
    }
}
