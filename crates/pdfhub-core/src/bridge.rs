//! In-process bridge between the UI and the PDF service
//!
//! The UI sends an operation name plus arguments and always gets a
//! `BridgeResponse` back: service errors are reported, never propagated.

use crate::command::{display_path, BridgeResponse, OperationRequest};
use crate::error::{PdfHubError, Result};
use crate::io::ensure_extension;
use crate::ranges::PageSelection;
use crate::service::PdfService;
use tracing::{error, info};

#[derive(Debug, Clone, Default)]
pub struct Bridge {
    service: PdfService,
}

impl Bridge {
    pub fn new(service: PdfService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &PdfService {
        &self.service
    }

    /// Run one request to completion.
    pub fn handle(&self, request: OperationRequest) -> BridgeResponse {
        let operation = request.name();
        match self.dispatch(request) {
            Ok(response) => {
                info!("{} successful", operation);
                response
            }
            Err(e) => {
                error!("{} failed: {}", operation, e);
                BridgeResponse::failure(&e)
            }
        }
    }

    /// JSON in, JSON out. Malformed requests are reported as invalid input.
    pub fn handle_json(&self, request: &str) -> String {
        let response = match serde_json::from_str::<OperationRequest>(request) {
            Ok(request) => self.handle(request),
            Err(e) => {
                error!("Rejected bridge request: {}", e);
                BridgeResponse::failure(&PdfHubError::InvalidInput(format!(
                    "Malformed request: {}",
                    e
                )))
            }
        };
        serde_json::to_string(&response).unwrap_or_else(|e| {
            format!(
                r#"{{"success":false,"error":"Failed to serialize response: {}"}}"#,
                e
            )
        })
    }

    fn dispatch(&self, request: OperationRequest) -> Result<BridgeResponse> {
        match request {
            OperationRequest::Merge { files, output } => {
                if files.is_empty() {
                    return Err(PdfHubError::InvalidInput("No files selected".into()));
                }
                let output = ensure_extension(&output, "pdf");
                let written = self.service.merge(&files, &output)?;
                Ok(BridgeResponse::ok(format!("Successfully merged {} PDFs", files.len()))
                    .with_output(&written))
            }
            OperationRequest::Split {
                file,
                ranges,
                output_dir,
            } => {
                let selections = ranges
                    .iter()
                    .map(|r| r.parse::<PageSelection>())
                    .collect::<Result<Vec<_>>>()?;
                let written = self.service.split(&file, &selections, &output_dir)?;
                Ok(BridgeResponse {
                    files: Some(written.iter().map(|p| display_path(p)).collect()),
                    ..BridgeResponse::ok(format!("Created {} PDF files", written.len()))
                })
            }
            OperationRequest::Compress {
                file,
                output,
                quality,
            } => {
                let output = ensure_extension(&output, "pdf");
                let report = self.service.compress(&file, quality, &output)?;
                Ok(BridgeResponse {
                    original_size: Some(report.original_size),
                    compressed_size: Some(report.compressed_size),
                    reduction_percent: Some(report.reduction_percent),
                    ..BridgeResponse::ok("PDF compressed successfully").with_output(&report.output)
                })
            }
            OperationRequest::ImagesToPdf { images, output } => {
                let output = ensure_extension(&output, "pdf");
                let written = self.service.images_to_pdf(&images, &output)?;
                Ok(
                    BridgeResponse::ok(format!("Converted {} images to PDF", images.len()))
                        .with_output(&written),
                )
            }
            OperationRequest::ExtractText { file } => {
                let text = self.service.extract_text(&file)?;
                Ok(BridgeResponse {
                    text: Some(text),
                    ..BridgeResponse::ok("Text extracted successfully")
                })
            }
            OperationRequest::PdfInfo { file } => {
                let info = self.service.info(&file)?;
                Ok(BridgeResponse {
                    page_count: Some(info.page_count),
                    file_size: Some(info.file_size),
                    ..BridgeResponse::ok(format!("{} pages", info.page_count))
                })
            }
            OperationRequest::PdfData { file } => {
                let data = self.service.data_base64(&file)?;
                Ok(BridgeResponse {
                    data: Some(data),
                    ..BridgeResponse::ok("PDF data loaded")
                })
            }
            OperationRequest::SaveText { text, output } => {
                let written = self.service.save_text(&text, &output)?;
                Ok(BridgeResponse::ok("Text saved").with_output(&written))
            }
        }
    }
}
