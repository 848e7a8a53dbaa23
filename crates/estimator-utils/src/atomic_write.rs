//! Atomic file writes
//!
//! Content goes to a temporary file in the target directory, is fsynced,
//! and is then renamed over the target. Readers see the old file or the new
//! one, never a partial write.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::io::Write;

use tempfile::NamedTempFile;

/// Result of an atomic write operation
#[derive(Debug, Clone, Default)]
pub struct AtomicWriteResult {
    /// Bytes written to the target
    pub bytes_written: usize,
}

/// Atomically write UTF-8 text, normalizing line endings to LF.
pub fn write_file_atomic(path: &Utf8Path, content: &str) -> Result<AtomicWriteResult> {
    let normalized = normalize_line_endings(content);
    write_bytes_atomic(path, normalized.as_bytes())
}

/// Atomically write raw bytes (spreadsheets and other binary artifacts).
///
/// The temporary file lives next to the target, so the final rename never
/// crosses a filesystem boundary.
pub fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<AtomicWriteResult> {
    let temp_dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    fs::create_dir_all(temp_dir)
        .with_context(|| format!("Failed to create parent directory: {temp_dir}"))?;

    let mut temp_file = NamedTempFile::new_in(temp_dir)
        .with_context(|| format!("Failed to create temporary file in: {temp_dir}"))?;

    temp_file
        .write_all(content)
        .with_context(|| "Failed to write content to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .with_context(|| "Failed to fsync temporary file")?;

    temp_file
        .persist(path.as_std_path())
        .map_err(|e| anyhow::anyhow!(e.error))
        .with_context(|| format!("Failed to atomically write file: {path}"))?;

    Ok(AtomicWriteResult {
        bytes_written: content.len(),
    })
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}
