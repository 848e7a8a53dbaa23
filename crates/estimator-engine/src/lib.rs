//! Estimation pipeline
//!
//! [`EstimationEngine`] drives a run end to end:
//!
//! ```text
//! extract → prompt → ┌ model → length check → normalize → repair → coerce ┐ → metrics → reports
//!                    └────────────── regenerate (max_attempts) ───────────┘
//! ```
//!
//! Regeneration is an explicit attempt loop bounded by
//! `Config::max_attempts()`. Extraction failures and non-transient model
//! errors stop the run immediately. In debug mode the prompt, each raw
//! response and the intermediate recovery text are written next to the
//! outputs (see [`debug`]).

pub mod debug;
mod pipeline;

use camino::Utf8PathBuf;
use estimator_llm::LlmResult;
use estimator_model::EstimationDocument;
use estimator_recovery::RepairStep;
use estimator_report::WrittenArtifact;
use estimator_utils::error::FieldIssue;
use estimator_utils::logging::StageTimings;

pub use pipeline::{EstimationEngine, should_regenerate};

/// A recovered estimation and how it was obtained.
#[derive(Debug, Clone)]
pub struct Estimation {
    pub document: EstimationDocument,
    /// Schema issues fixed locally during coercion
    pub issues: Vec<FieldIssue>,
    pub repair_steps: Vec<RepairStep>,
    /// Attempt that produced the document (1-based)
    pub attempts: u32,
    /// Model call that produced the response; `None` for saved responses.
    pub llm: Option<LlmResult>,
    /// Input document or saved response file
    pub source: Option<Utf8PathBuf>,
}

/// Result of a complete run.
#[derive(Debug)]
pub struct RunOutcome {
    pub estimation: Estimation,
    pub artifacts: Vec<WrittenArtifact>,
    pub timings: StageTimings,
}
