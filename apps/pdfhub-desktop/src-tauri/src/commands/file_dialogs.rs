//! Native file and folder pickers.
//!
//! Dialogs start in the user's Documents folder and return plain path
//! strings, which the UI passes straight back into the operation commands.
//! A cancelled dialog is not an error: it yields an empty list or `None`.

use pdfhub_core::io::ensure_extension;
use std::path::PathBuf;
use tauri_plugin_dialog::{DialogExt, FilePath};

/// Image extensions accepted by `images_to_pdf`
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "JPG", "JPEG", "PNG", "GIF",
    "BMP", "TIFF", "TIF", "WEBP",
];

const MAX_NAME_CHARS: usize = 200;

/// Sanitizes a suggested filename for saving.
///
/// - Path separators and reserved characters become `_`
/// - Control characters are removed
/// - Leading and trailing whitespace and dots are trimmed
/// - At most 200 characters are kept
/// - An empty result falls back to `document.{extension}`
pub fn sanitize_filename(name: &str, extension: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter_map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => Some('_'),
            '\0'..='\x1f' | '\x7f' => None,
            c => Some(c),
        })
        .collect();

    let trimmed = sanitized.trim().trim_matches('.');
    let limited = match trimmed.char_indices().nth(MAX_NAME_CHARS) {
        Some((idx, _)) => &trimmed[..idx],
        None => trimmed,
    };

    if limited.is_empty() {
        format!("document.{}", extension)
    } else {
        limited.to_string()
    }
}

pub fn format_selection_error(error: impl std::fmt::Display) -> String {
    format!(
        "Could not access the selected location. Please try again. ({})",
        error
    )
}

fn default_directory() -> PathBuf {
    dirs::document_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn to_path_string(path: FilePath) -> Result<String, String> {
    path.into_path()
        .map(|p| p.to_string_lossy().into_owned())
        .map_err(format_selection_error)
}

fn collect_paths(paths: Option<Vec<FilePath>>) -> Result<Vec<String>, String> {
    paths
        .unwrap_or_default()
        .into_iter()
        .map(to_path_string)
        .collect()
}

/// Pick one or more PDF files, in the order the dialog returns them.
#[tauri::command]
pub async fn select_files(app: tauri::AppHandle, multiple: bool) -> Result<Vec<String>, String> {
    let dialog = app
        .dialog()
        .file()
        .set_title("Select PDF Documents")
        .add_filter("PDF Documents", &["pdf", "PDF"])
        .set_directory(default_directory());

    if multiple {
        collect_paths(dialog.blocking_pick_files())
    } else {
        collect_paths(dialog.blocking_pick_file().map(|p| vec![p]))
    }
}

#[tauri::command]
pub async fn select_images(app: tauri::AppHandle) -> Result<Vec<String>, String> {
    let paths = app
        .dialog()
        .file()
        .set_title("Select Images")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .set_directory(default_directory())
        .blocking_pick_files();
    collect_paths(paths)
}

/// Pick the folder split results are written into.
#[tauri::command]
pub async fn select_folder(app: tauri::AppHandle) -> Result<Option<String>, String> {
    app.dialog()
        .file()
        .set_title("Choose Output Folder")
        .set_directory(default_directory())
        .blocking_pick_folder()
        .map(to_path_string)
        .transpose()
}

/// Ask where to save an output file.
///
/// The returned path always ends in `.{extension}`.
#[tauri::command]
pub async fn select_save_path(
    app: tauri::AppHandle,
    suggested_name: String,
    extension: String,
) -> Result<Option<String>, String> {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    let (label, filter) = match extension.as_str() {
        "pdf" => ("PDF Documents", vec!["pdf", "PDF"]),
        "txt" => ("Text Files", vec!["txt"]),
        other => ("Files", vec![other]),
    };

    let chosen = app
        .dialog()
        .file()
        .set_title("Save As")
        .add_filter(label, &filter)
        .set_directory(default_directory())
        .set_file_name(sanitize_filename(&suggested_name, &extension))
        .blocking_save_file();

    match chosen {
        Some(path) => {
            let path = path.into_path().map_err(format_selection_error)?;
            Ok(Some(
                ensure_extension(&path, &extension)
                    .to_string_lossy()
                    .into_owned(),
            ))
        }
        None => Ok(None),
    }
}
