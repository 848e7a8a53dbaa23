//! estimator - effort estimation from project specification documents
//!
//! A specification document (PDF, DOCX or plain text) is turned into a
//! prompt, sent to a language model, and whatever comes back is recovered
//! into a validated [`EstimationDocument`]: the JSON payload is cut out of
//! prose and code fences, structurally repaired, coerced onto the domain
//! model, and its subtotals and summary are recomputed. The result is
//! written as JSON and as an XLSX workbook.
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! export GROQ_API_KEY=...
//! estimator estimate spec.pdf --output estimate.json --xlsx estimate.xlsx
//!
//! # Offline: recover a saved model response
//! estimator recover response.txt
//! ```
//!
//! # Library
//!
//! The recovery engine is pure and needs no network:
//!
//! ```rust
//! let raw = "Here you go: {\"phases\": [{\"name\": \"Development\", \
//!            \"tasks\": [{\"taskName\": \"API\", \"minHours\": 8, \"maxHours\": 12,}]}]} Thanks!";
//! let recovery = estimator::recover(raw).unwrap();
//! assert_eq!(recovery.document.summary.total_max_hours, 12.0);
//! ```
//!
//! Full runs go through [`EstimationEngine`] with a [`Config`].

pub mod cli;

pub use estimator_config::{CliArgs, Config, ConfigBuilder};
pub use estimator_engine::{Estimation, EstimationEngine, RunOutcome};
pub use estimator_model::{
    CanonicalPhase, EstimationDocument, HoursRange, Phase, ProjectInfo, Recommendation, Risk,
    Summary, Task,
};
pub use estimator_recovery::{Recovery, recover};
pub use estimator_utils::error::{EstimatorError, UserFriendlyError};
pub use estimator_utils::exit_codes::ExitCode;
pub use estimator_utils::types::Stage;
