//! PDF text extraction
//!
//! Text is pulled page by page so each page can be labelled. `lopdf`'s
//! content stream walker runs first; pages it cannot handle are retried with
//! `pdf-extract` on a single-page copy of the document.

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::{io, split};
use lopdf::Document;
use std::path::Path;
use tracing::{debug, info, warn};

/// Header written before each page's text.
pub fn page_marker(page_number: u32) -> String {
    format!("=== Page {} ===", page_number)
}

pub fn extract_text_file(input: &Path, config: &ServiceConfig) -> Result<String> {
    info!("Extracting text from: {}", input.display());
    let doc = io::load_pdf(input, config.max_input_bytes)?;
    Ok(extract_document_text(&doc))
}

/// Concatenate the text of every page with a page marker. Pages without
/// text are left out, so image-only documents give an empty string.
pub fn extract_document_text(doc: &Document) -> String {
    let pages = doc.get_pages();
    let total_pages = pages.len();

    let mut text_content = Vec::new();
    for &page_number in pages.keys() {
        let text = page_text(doc, page_number);
        if text.trim().is_empty() {
            continue;
        }
        text_content.push(format!("{}\n{}\n", page_marker(page_number), text));
        debug!("Extracted text from page {}/{}", page_number, total_pages);
    }

    info!("Successfully extracted text from {} pages", total_pages);
    text_content.join("\n")
}

fn page_text(doc: &Document, page_number: u32) -> String {
    match doc.extract_text(&[page_number]) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "lopdf could not read page {} ({}), trying pdf-extract",
                page_number, e
            );
            fallback_page_text(doc, page_number).unwrap_or_else(|reason| {
                warn!("Page {} has no extractable text: {}", page_number, reason);
                String::new()
            })
        }
    }
}

fn fallback_page_text(doc: &Document, page_number: u32) -> std::result::Result<String, String> {
    let mut single = split::extract_pages(doc, &[page_number]).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    single.save_to(&mut bytes).map_err(|e| e.to_string())?;
    guard_panics(|| pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string()))
}

/// pdf-extract can panic on unusual font data; a panic counts as a failure.
fn guard_panics<F>(extract: F) -> std::result::Result<String, String>
where
    F: FnOnce() -> std::result::Result<String, String> + std::panic::UnwindSafe,
{
    std::panic::catch_unwind(extract).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown cause".to_string());
        Err(format!("pdf-extract panicked: {}", reason))
    })
}
