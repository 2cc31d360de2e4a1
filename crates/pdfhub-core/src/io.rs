//! Reading inputs and writing outputs
//!
//! Outputs go through a temporary file in the destination directory that is
//! renamed over the target once fully written, so a failed operation never
//! leaves a partial file behind.

use crate::error::{PdfHubError, Result};
use lopdf::Document;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read an input file, rejecting it if larger than `max_bytes`.
pub fn read_input(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let metadata = fs::metadata(path).map_err(|_| PdfHubError::FileNotFound(path.to_path_buf()))?;
    if !metadata.is_file() {
        return Err(PdfHubError::FileNotFound(path.to_path_buf()));
    }
    if metadata.len() > max_bytes {
        return Err(PdfHubError::InvalidInput(format!(
            "{} is too large ({} MB limit)",
            path.display(),
            max_bytes / (1024 * 1024)
        )));
    }

    fs::read(path).map_err(|e| {
        tracing::debug!("Read of {} failed: {}", path.display(), e);
        PdfHubError::FileNotFound(path.to_path_buf())
    })
}

/// Read and parse a PDF.
pub fn load_pdf(path: &Path, max_bytes: u64) -> Result<Document> {
    let bytes = read_input(path, max_bytes)?;
    parse_pdf(&bytes, path)
}

pub fn parse_pdf(bytes: &[u8], path: &Path) -> Result<Document> {
    let doc = Document::load_mem(bytes).map_err(|e| {
        PdfHubError::UnsupportedFormat(format!("{} is not a readable PDF: {}", path.display(), e))
    })?;
    if doc.is_encrypted() {
        return Err(PdfHubError::UnsupportedFormat(format!(
            "{} is password protected",
            path.display()
        )));
    }
    Ok(doc)
}

/// Serialize a document and write it atomically to `path`.
pub fn save_pdf(doc: &mut Document, path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfHubError::WriteError(format!("Failed to serialize PDF: {}", e)))?;
    write_output(path, &buffer)
}

/// Write `bytes` to `path`, replacing any existing file.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let write_error = |e: std::io::Error| {
        PdfHubError::WriteError(format!("{} ({})", path.display(), e))
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(bytes).map_err(write_error)?;
    tmp.flush().map_err(write_error)?;
    tmp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

/// Ensure `path` ends with the given extension (case-insensitive).
pub fn ensure_extension(path: &Path, ext: &str) -> PathBuf {
    let has_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext));
    if has_ext {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(ext);
        PathBuf::from(name)
    }
}

/// File name without extension, used to name derived outputs.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "document".to_string())
}
