//! One command per PDF operation.
//!
//! Each command builds an [`OperationRequest`] and hands it to the managed
//! [`Bridge`]. Failures come back inside the `BridgeResponse`, so none of
//! these commands reject on the JS side.

use pdfhub_core::{Bridge, BridgeResponse, CompressionQuality, OperationRequest};
use std::path::PathBuf;
use tauri::State;

#[tauri::command]
pub fn merge_pdfs(bridge: State<'_, Bridge>, files: Vec<PathBuf>, output: PathBuf) -> BridgeResponse {
    bridge.handle(OperationRequest::Merge { files, output })
}

#[tauri::command]
pub fn split_pdf(
    bridge: State<'_, Bridge>,
    file: PathBuf,
    ranges: Vec<String>,
    output_dir: PathBuf,
) -> BridgeResponse {
    bridge.handle(OperationRequest::Split {
        file,
        ranges,
        output_dir,
    })
}

#[tauri::command]
pub fn compress_pdf(
    bridge: State<'_, Bridge>,
    file: PathBuf,
    output: PathBuf,
    quality: Option<CompressionQuality>,
) -> BridgeResponse {
    bridge.handle(OperationRequest::Compress {
        file,
        output,
        quality,
    })
}

#[tauri::command]
pub fn image_to_pdf(bridge: State<'_, Bridge>, images: Vec<PathBuf>, output: PathBuf) -> BridgeResponse {
    bridge.handle(OperationRequest::ImagesToPdf { images, output })
}

#[tauri::command]
pub fn pdf_to_text(bridge: State<'_, Bridge>, file: PathBuf) -> BridgeResponse {
    bridge.handle(OperationRequest::ExtractText { file })
}

#[tauri::command]
pub fn get_pdf_info(bridge: State<'_, Bridge>, file: PathBuf) -> BridgeResponse {
    bridge.handle(OperationRequest::PdfInfo { file })
}

/// Base64 file contents for the in-app preview.
#[tauri::command]
pub fn get_pdf_data(bridge: State<'_, Bridge>, file: PathBuf) -> BridgeResponse {
    bridge.handle(OperationRequest::PdfData { file })
}

#[tauri::command]
pub fn save_text_file(bridge: State<'_, Bridge>, text: String, output: PathBuf) -> BridgeResponse {
    bridge.handle(OperationRequest::SaveText { text, output })
}
