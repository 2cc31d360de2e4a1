//! PDF Split algorithm
//!
//! Each page selection becomes its own output document.

use crate::config::ServiceConfig;
use crate::error::{PdfHubError, Result};
use crate::ranges::PageSelection;
use crate::{io, page_tree};
use lopdf::Document;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Split `input` into one file per selection inside `output_dir`.
///
/// Outputs are named `{stem}_part{n}.pdf`. Every selection is checked
/// against the page count before the first file is written.
pub fn split_file(
    input: &Path,
    selections: &[PageSelection],
    output_dir: &Path,
    config: &ServiceConfig,
) -> Result<Vec<PathBuf>> {
    if selections.is_empty() {
        return Err(PdfHubError::InvalidInput("No page ranges specified".into()));
    }

    let doc = io::load_pdf(input, config.max_input_bytes)?;
    let total_pages = doc.get_pages().len() as u32;

    info!(
        "Splitting PDF with {} pages into {} parts...",
        total_pages,
        selections.len()
    );

    for selection in selections {
        selection.validate(total_pages)?;
    }

    // Serialize every part before anything is written
    let base_name = io::file_stem(input);
    let mut parts = Vec::with_capacity(selections.len());
    for (idx, selection) in selections.iter().enumerate() {
        let mut part = extract_pages(&doc, &selection.pages())?;
        let mut buffer = Vec::new();
        part.save_to(&mut buffer)
            .map_err(|e| PdfHubError::WriteError(format!("Failed to serialize PDF: {}", e)))?;
        let output = output_dir.join(format!("{}_part{}.pdf", base_name, idx + 1));
        parts.push((output, buffer, selection));
    }

    fs::create_dir_all(output_dir).map_err(|e| {
        PdfHubError::WriteError(format!("{} ({})", output_dir.display(), e))
    })?;

    let mut output_files = Vec::with_capacity(parts.len());
    for (output, buffer, selection) in parts {
        if let Err(e) = io::write_output(&output, &buffer) {
            remove_written(&output_files);
            return Err(e);
        }
        info!("Created: {} (pages {})", output.display(), selection);
        output_files.push(output);
    }

    info!("Successfully split PDF into {} files", output_files.len());
    Ok(output_files)
}

fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not remove partial output {}: {}", path.display(), e);
        }
    }
}

/// Build a new document holding only `pages` (1-indexed), in that order.
pub fn extract_pages(doc: &Document, pages: &[u32]) -> Result<Document> {
    if pages.is_empty() {
        return Err(PdfHubError::InvalidRange("No pages specified".into()));
    }

    let page_ids = doc.get_pages();
    let page_count = page_ids.len();
    let selected = pages
        .iter()
        .map(|n| {
            page_ids.get(n).copied().ok_or_else(|| {
                PdfHubError::InvalidRange(format!(
                    "Page {} does not exist (document has {} pages)",
                    n, page_count
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut new_doc = doc.clone();
    page_tree::rebuild_page_tree(&mut new_doc, &selected)?;

    // Unselected pages and their resources become unreachable
    new_doc.prune_objects();
    new_doc.compress();

    Ok(new_doc)
}
