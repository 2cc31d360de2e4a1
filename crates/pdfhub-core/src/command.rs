use crate::config::CompressionQuality;
use crate::error::{ErrorKind, PdfHubError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One UI action, as sent across the bridge.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum OperationRequest {
    Merge {
        files: Vec<PathBuf>,
        output: PathBuf,
    },
    Split {
        file: PathBuf,
        /// One selection string per output file, e.g. `["1-3", "4-6", "7"]`
        ranges: Vec<String>,
        output_dir: PathBuf,
    },
    Compress {
        file: PathBuf,
        output: PathBuf,
        #[serde(default)]
        quality: Option<CompressionQuality>,
    },
    ImagesToPdf {
        images: Vec<PathBuf>,
        output: PathBuf,
    },
    ExtractText {
        file: PathBuf,
    },
    PdfInfo {
        file: PathBuf,
    },
    PdfData {
        file: PathBuf,
    },
    SaveText {
        text: String,
        output: PathBuf,
    },
}

impl OperationRequest {
    pub fn name(&self) -> &'static str {
        match self {
            OperationRequest::Merge { .. } => "merge",
            OperationRequest::Split { .. } => "split",
            OperationRequest::Compress { .. } => "compress",
            OperationRequest::ImagesToPdf { .. } => "images_to_pdf",
            OperationRequest::ExtractText { .. } => "extract_text",
            OperationRequest::PdfInfo { .. } => "pdf_info",
            OperationRequest::PdfData { .. } => "pdf_data",
            OperationRequest::SaveText { .. } => "save_text",
        }
    }
}

/// Result of one UI action. Only the fields relevant to the operation are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BridgeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64-encoded PDF data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduction_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl BridgeResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn failure(error: &PdfHubError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
            ..Self::default()
        }
    }

    pub fn with_output(mut self, path: &Path) -> Self {
        self.output = Some(display_path(path));
        self
    }
}

pub(crate) fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
