//! Domain model for project estimations
//!
//! [`EstimationDocument`] is the root aggregate: project info, ordered
//! phases of tasks, a derived [`Summary`], risks and recommendations.
//! Field names serialize in camelCase to match the model's JSON contract.

mod document;
mod vocabulary;

pub use document::{
    EstimationDocument, HoursRange, Phase, ProjectInfo, Recommendation, Risk, Summary, Task,
};
pub use vocabulary::{CanonicalPhase, DEFAULT_STATUS, KNOWN_STATUSES, canonical_status};
