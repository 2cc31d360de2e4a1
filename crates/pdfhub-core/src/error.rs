use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfHubError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not write output: {0}")]
    WriteError(String),
}

/// Machine-readable error category reported across the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FileNotFound,
    InvalidInput,
    InvalidRange,
    UnsupportedFormat,
    WriteError,
}

impl PdfHubError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PdfHubError::FileNotFound(_) => ErrorKind::FileNotFound,
            PdfHubError::InvalidInput(_) => ErrorKind::InvalidInput,
            PdfHubError::InvalidRange(_) => ErrorKind::InvalidRange,
            PdfHubError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            PdfHubError::WriteError(_) => ErrorKind::WriteError,
        }
    }
}

pub type Result<T> = std::result::Result<T, PdfHubError>;
