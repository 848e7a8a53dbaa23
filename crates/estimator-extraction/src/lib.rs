//! Document text extraction
//!
//! Turns the input specification document into plain text for the prompt.
//! Supported inputs are PDF (text layer only), Word (`.docx`, and `.doc`
//! files that are really OOXML containers), and plain text / Markdown.

mod docx;
mod pdf;

use camino::{Utf8Path, Utf8PathBuf};
use estimator_utils::error::ExtractionError;
use tracing::{debug, info};

/// Extensions accepted by [`extract_text`], lowercase and without the dot.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["pdf", "docx", "doc", "txt", "md"];

/// Input format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Word,
    PlainText,
}

impl DocumentFormat {
    /// Format for `path`, matching the extension case-insensitively.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ExtractionError> {
        let extension = path.extension().unwrap_or_default().to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" | "doc" => Ok(Self::Word),
            "txt" | "md" => Ok(Self::PlainText),
            _ => Err(ExtractionError::UnsupportedFormat {
                path: path.to_string(),
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    format!(".{extension}")
                },
            }),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "docx",
            Self::PlainText => "text",
        }
    }
}

/// Text pulled out of one input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub path: Utf8PathBuf,
    pub format: DocumentFormat,
    /// Trimmed, never empty.
    pub text: String,
}

impl ExtractedDocument {
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Extract the plain text of the document at `path`.
///
/// The existence check comes first, so a missing `.xyz` file reports
/// `DocumentNotFound` rather than `UnsupportedFormat`.
pub fn extract_text(path: &Utf8Path) -> Result<ExtractedDocument, ExtractionError> {
    if !path.is_file() {
        return Err(ExtractionError::DocumentNotFound {
            path: path.to_string(),
        });
    }

    let format = DocumentFormat::from_path(path)?;
    debug!(path = %path, format = format.as_str(), "Extracting document text");

    let raw = match format {
        DocumentFormat::Pdf => pdf::extract(path)?,
        DocumentFormat::Word => docx::extract(path)?,
        DocumentFormat::PlainText => {
            std::fs::read_to_string(path).map_err(|e| ExtractionError::ExtractionFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })?
        }
    };

    let text = raw.trim().to_string();
    if text.is_empty() {
        return Err(ExtractionError::EmptyDocument {
            path: path.to_string(),
        });
    }

    let document = ExtractedDocument {
        path: path.to_path_buf(),
        format,
        text,
    };
    info!(
        path = %path,
        format = format.as_str(),
        chars = document.char_count(),
        "Document text extracted"
    );
    Ok(document)
}

fn failed(path: &Utf8Path, reason: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::ExtractionFailed {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
