//! Report output
//!
//! Writes the estimation as a JSON document and as an XLSX workbook. The
//! two artifacts are written independently: a failure on one does not stop
//! the other, and every failure is reported.

mod json;
mod xlsx;

use camino::{Utf8Path, Utf8PathBuf};
use estimator_model::EstimationDocument;
use estimator_utils::atomic_write::{write_bytes_atomic, write_file_atomic};
use estimator_utils::error::ReportError;
use tracing::{info, warn};

pub use json::render_json;
pub use xlsx::{SHEET_NAME, TITLE, render_xlsx};

/// Kind of report artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Json,
    Spreadsheet,
}

impl Artifact {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "estimation JSON",
            Self::Spreadsheet => "spreadsheet",
        }
    }
}

/// An artifact that reached disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    pub artifact: Artifact,
    pub path: Utf8PathBuf,
    pub bytes: usize,
}

fn write_failed(artifact: Artifact, path: &Utf8Path, reason: impl ToString) -> ReportError {
    ReportError::ArtifactWriteFailed {
        artifact: artifact.as_str().to_string(),
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// Render and atomically write the estimation JSON.
pub fn write_json(doc: &EstimationDocument, path: &Utf8Path) -> Result<WrittenArtifact, ReportError> {
    let text = render_json(doc).map_err(|e| write_failed(Artifact::Json, path, e))?;
    let result =
        write_file_atomic(path, &text).map_err(|e| write_failed(Artifact::Json, path, format!("{e:#}")))?;
    Ok(WrittenArtifact {
        artifact: Artifact::Json,
        path: path.to_owned(),
        bytes: result.bytes_written,
    })
}

/// Render and atomically write the XLSX workbook.
pub fn write_xlsx(doc: &EstimationDocument, path: &Utf8Path) -> Result<WrittenArtifact, ReportError> {
    let bytes = render_xlsx(doc).map_err(|e| write_failed(Artifact::Spreadsheet, path, e))?;
    let result = write_bytes_atomic(path, &bytes)
        .map_err(|e| write_failed(Artifact::Spreadsheet, path, format!("{e:#}")))?;
    Ok(WrittenArtifact {
        artifact: Artifact::Spreadsheet,
        path: path.to_owned(),
        bytes: result.bytes_written,
    })
}

/// Write both artifacts.
///
/// # Errors
///
/// A single failed artifact is returned as `ArtifactWriteFailed`; when both
/// fail the errors are collected in `MultipleFailures`.
pub fn write_reports(
    doc: &EstimationDocument,
    json_path: &Utf8Path,
    xlsx_path: &Utf8Path,
) -> Result<Vec<WrittenArtifact>, ReportError> {
    let mut written = Vec::with_capacity(2);
    let mut failures = Vec::new();

    for outcome in [write_json(doc, json_path), write_xlsx(doc, xlsx_path)] {
        match outcome {
            Ok(artifact) => {
                info!(
                    artifact = artifact.artifact.as_str(),
                    path = %artifact.path,
                    bytes = artifact.bytes,
                    "Report written"
                );
                written.push(artifact);
            }
            Err(e) => {
                warn!(error = %e, "Report artifact failed");
                failures.push(e);
            }
        }
    }

    match failures.len() {
        0 => Ok(written),
        1 => Err(failures.remove(0)),
        _ => Err(ReportError::MultipleFailures { failures }),
    }
}
