//! Tauri commands for the PDF Hub desktop app.

pub mod file_dialogs;
pub mod operations;

pub use file_dialogs::{select_files, select_folder, select_images, select_save_path};
pub use operations::{
    compress_pdf, get_pdf_data, get_pdf_info, image_to_pdf, merge_pdfs, pdf_to_text,
    save_text_file, split_pdf,
};
