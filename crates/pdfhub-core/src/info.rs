//! Document info, raw data for preview, and saving extracted text

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::io;
use base64::Engine;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PdfInfo {
    pub page_count: u32,
    pub file_size: u64,
}

pub fn pdf_info(input: &Path, config: &ServiceConfig) -> Result<PdfInfo> {
    let bytes = io::read_input(input, config.max_input_bytes)?;
    let doc = io::parse_pdf(&bytes, input)?;
    let info = PdfInfo {
        page_count: doc.get_pages().len() as u32,
        file_size: bytes.len() as u64,
    };
    info!("PDF info: {} pages", info.page_count);
    Ok(info)
}

/// The file's bytes as standard base64, for rendering in the UI.
pub fn pdf_data_base64(input: &Path, config: &ServiceConfig) -> Result<String> {
    let bytes = io::read_input(input, config.max_input_bytes)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    info!("PDF data loaded: {} bytes (base64)", encoded.len());
    Ok(encoded)
}

/// Write `text` as UTF-8, adding a `.txt` extension when missing.
pub fn save_text(text: &str, output: &Path) -> Result<PathBuf> {
    let output = io::ensure_extension(output, "txt");
    io::write_output(&output, text.as_bytes())?;
    info!("Text saved to: {}", output.display());
    Ok(output)
}
