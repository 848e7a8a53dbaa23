//! Structured-output recovery for model responses
//!
//! Pipeline, each stage usable on its own:
//!
//! 1. [`normalize`]: cut the JSON payload out of prose and code fences
//! 2. [`repair`]: fix trailing commas, loose JSON dialects and truncation
//! 3. [`coerce`]: map the parsed value onto [`EstimationDocument`]
//! 4. [`apply_metrics`]: recompute subtotals and summary
//!
//! [`recover`] runs all four. The engine calls the stages individually so it
//! can time them and persist intermediate text.

mod coerce;
mod lexical;
mod metrics;
mod normalize;
mod repair;
mod scan;

pub use coerce::{Coerced, coerce};
pub use metrics::{
    STANDARD_WEEKLY_HOURS, apply_metrics, duration_weeks, quantize_hours, recompute,
};
pub use normalize::normalize;
pub use repair::{RepairStep, Repaired, repair};

use estimator_model::EstimationDocument;
use estimator_utils::error::{FieldIssue, RecoveryError};

/// Everything produced while recovering one response.
#[derive(Debug, Clone)]
pub struct Recovery {
    /// Finalized document with derived metrics
    pub document: EstimationDocument,
    /// Locally recovered schema issues
    pub issues: Vec<FieldIssue>,
    /// Candidate JSON text before repair
    pub normalized: String,
    /// Text that parsed and the steps that produced it
    pub repaired: Repaired,
}

/// Reject responses too short to hold an estimation.
///
/// Length is counted in characters after trimming whitespace.
pub fn check_response_length(raw: &str, min_chars: usize) -> Result<(), RecoveryError> {
    let length = raw.trim().chars().count();
    if length < min_chars {
        return Err(RecoveryError::EmptyOrShortResponse {
            length,
            minimum: min_chars,
        });
    }
    Ok(())
}

/// Run the full recovery pipeline on raw model text.
pub fn recover(raw: &str) -> Result<Recovery, RecoveryError> {
    let normalized = normalize(raw)?;
    let repaired = repair(&normalized)?;
    let Coerced { document, issues } = coerce(&repaired.value)?;

    Ok(Recovery {
        document: apply_metrics(document),
        issues,
        normalized,
        repaired,
    })
}
