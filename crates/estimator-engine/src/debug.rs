//! Diagnostic artifacts written in debug mode

use camino::{Utf8Path, Utf8PathBuf};
use estimator_utils::atomic_write::write_bytes_atomic;
use tracing::{debug, warn};

pub const PROMPT_FILE: &str = "prompt.txt";
pub const RESPONSE_FILE: &str = "response.txt";
pub const NORMALIZED_FILE: &str = "normalized.txt";
pub const REPAIRED_FILE: &str = "repaired.txt";
pub const VALIDATION_REPORT_FILE: &str = "validation_report.json";

/// `response.attempt{n}.txt`
#[must_use]
pub fn attempt_response_file(attempt: u32) -> String {
    format!("response.attempt{attempt}.txt")
}

/// Writes diagnostics into one directory. A failed write is logged and
/// otherwise ignored.
#[derive(Debug, Clone)]
pub struct DebugArtifacts {
    dir: Utf8PathBuf,
}

impl DebugArtifacts {
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Write `content` byte-for-byte; returns the path on success.
    pub fn write(&self, name: &str, content: &str) -> Option<Utf8PathBuf> {
        let path = self.dir.join(name);
        match write_bytes_atomic(&path, content.as_bytes()) {
            Ok(_) => {
                debug!(path = %path, bytes = content.len(), "Debug artifact written");
                Some(path)
            }
            Err(e) => {
                warn!(path = %path, error = %format!("{e:#}"), "Could not write debug artifact");
                None
            }
        }
    }

    pub fn write_json(&self, name: &str, value: &serde_json::Value) -> Option<Utf8PathBuf> {
        match serde_json::to_string_pretty(value) {
            Ok(text) => self.write(name, &text),
            Err(e) => {
                warn!(name, error = %e, "Could not serialize debug artifact");
                None
            }
        }
    }
}
