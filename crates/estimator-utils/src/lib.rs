//! Foundation utilities shared by every estimator crate
//!
//! - [`error`]: the error taxonomy and [`error::EstimatorError`]
//! - [`exit_codes`]: process exit status mapping
//! - [`logging`]: tracing subscriber setup and stage spans
//! - [`atomic_write`]: temp file + fsync + rename writes
//! - [`redaction`]: credential scrubbing for logs and user-facing text
//! - [`types`]: pipeline [`types::Stage`] and [`types::ConfigSource`]

pub mod atomic_write;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod redaction;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use error::{EstimatorError, UserFriendlyError};
pub use exit_codes::ExitCode;
pub use types::{ConfigSource, Stage};
