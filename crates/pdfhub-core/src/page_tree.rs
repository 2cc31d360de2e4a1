//! Page tree rewriting shared by merge and split

use crate::error::{PdfHubError, Result};
use lopdf::{Document, Object, ObjectId};

/// Page attributes a page may inherit from its ancestors.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic Parent chains in damaged files.
const MAX_TREE_DEPTH: usize = 64;

fn structure_error(msg: &str) -> PdfHubError {
    PdfHubError::UnsupportedFormat(format!("Invalid page tree: {}", msg))
}

/// Object id of the root Pages node.
pub fn pages_root_id(doc: &Document) -> Result<ObjectId> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| structure_error("no Root in trailer"))?;

    doc.get_object(catalog_id)
        .and_then(Object::as_dict)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|_| structure_error("no Pages in catalog"))
}

/// Copy inherited attributes onto the page so it survives re-parenting.
pub fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut inherited: Vec<(&[u8], Object)> = Vec::new();
    {
        let page = doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|_| structure_error("page is not a dictionary"))?;

        let mut missing: Vec<&[u8]> = INHERITABLE
            .iter()
            .copied()
            .filter(|key| !page.has(key))
            .collect();

        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
        let mut depth = 0;
        while let (Some(parent_id), false) = (parent, missing.is_empty()) {
            depth += 1;
            if depth > MAX_TREE_DEPTH {
                return Err(structure_error("page tree is too deep"));
            }
            let Ok(node) = doc.get_object(parent_id).and_then(Object::as_dict) else {
                break;
            };
            missing.retain(|key| match node.get(key) {
                Ok(value) => {
                    inherited.push((*key, value.clone()));
                    false
                }
                Err(_) => true,
            });
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        }
    }

    if inherited.is_empty() {
        return Ok(());
    }

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| structure_error("page is not a dictionary"))?;
    for (key, value) in inherited {
        page.set(key.to_vec(), value);
    }
    Ok(())
}

/// Replace the document's page tree with a flat list of `pages`.
pub fn rebuild_page_tree(doc: &mut Document, pages: &[ObjectId]) -> Result<()> {
    let root_id = pages_root_id(doc)?;

    for &page_id in pages {
        materialize_inherited(doc, page_id)?;
    }

    for &page_id in pages {
        let page = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|_| structure_error("page is not a dictionary"))?;
        page.set("Parent", Object::Reference(root_id));
    }

    let root = doc
        .get_object_mut(root_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| structure_error("Pages is not a dictionary"))?;
    root.set(
        "Kids",
        Object::Array(pages.iter().map(|&id| Object::Reference(id)).collect()),
    );
    root.set("Count", Object::Integer(pages.len() as i64));
    Ok(())
}
