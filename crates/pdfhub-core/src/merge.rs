//! PDF Merge algorithm
//!
//! Combines multiple PDFs into a single document.

use crate::config::ServiceConfig;
use crate::error::{PdfHubError, Result};
use crate::{io, page_tree};
use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Merge the PDFs at `paths`, in order, into `output`.
pub fn merge_files<P: AsRef<Path>>(
    paths: &[P],
    output: &Path,
    config: &ServiceConfig,
) -> Result<PathBuf> {
    if paths.len() < 2 {
        return Err(PdfHubError::InvalidInput(format!(
            "At least two PDFs are needed to merge, got {}",
            paths.len()
        )));
    }

    info!("Merging {} PDF files...", paths.len());

    // Everything is parsed before anything is written
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        debug!("Adding: {}", path.display());
        documents.push(io::load_pdf(path, config.max_input_bytes)?);
    }

    let mut merged = merge_documents(documents)?;
    io::save_pdf(&mut merged, output)?;

    info!("Successfully merged PDFs to: {}", output.display());
    Ok(output.to_path_buf())
}

/// Merge parsed documents into one
///
/// The algorithm:
/// 1. Start with the first document as the destination
/// 2. For each further document:
///    a. Offset its object ids past the destination's max id
///    b. Import all objects with remapped references
///    c. Append its pages to the destination page list
/// 3. Rebuild the destination page tree over the combined page list
/// 4. Drop objects that are no longer reachable and compress
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    let mut documents = documents.into_iter();
    let mut dest = documents
        .next()
        .ok_or_else(|| PdfHubError::InvalidInput("No documents to merge".into()))?;

    let mut dest_page_refs = page_references(&dest);
    let mut dest_max_id = dest.max_id;

    for source in documents {
        let source_pages = page_references(&source);
        let id_offset = dest_max_id;

        for (old_id, mut object) in source.objects.into_iter() {
            offset_references(&mut object, id_offset);
            dest.objects.insert((old_id.0 + id_offset, old_id.1), object);
        }

        dest_page_refs.extend(
            source_pages
                .into_iter()
                .map(|(num, gen)| (num + id_offset, gen)),
        );

        dest_max_id = (source.max_id + id_offset).max(dest_max_id);
    }

    dest.max_id = dest_max_id;
    page_tree::rebuild_page_tree(&mut dest, &dest_page_refs)?;

    dest.prune_objects();
    dest.compress();

    Ok(dest)
}

/// Page object references in document order
fn page_references(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// Shift every reference inside `obj` by `offset`
fn offset_references(obj: &mut Object, offset: u32) {
    match obj {
        Object::Reference(id) => id.0 += offset,
        Object::Array(arr) => arr.iter_mut().for_each(|o| offset_references(o, offset)),
        Object::Dictionary(dict) => dict
            .iter_mut()
            .for_each(|(_, value)| offset_references(value, offset)),
        Object::Stream(stream) => stream
            .dict
            .iter_mut()
            .for_each(|(_, value)| offset_references(value, offset)),
        _ => {}
    }
}
