//! PDF Hub desktop shell.
//!
//! Registers the operation and dialog commands over a single managed
//! [`Bridge`] and opens the main window.

pub mod commands;

use commands::{
    compress_pdf, get_pdf_data, get_pdf_info, image_to_pdf, merge_pdfs, pdf_to_text,
    save_text_file, select_files, select_folder, select_images, select_save_path, split_pdf,
};
use pdfhub_core::{Bridge, PdfService, ServiceConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    // try_init: a subscriber may already be installed when embedded
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Register all Tauri commands and run the application.
pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServiceConfig::from_env();
    tracing::info!(
        "Starting PDF Hub v{} (page size {:?})",
        env!("CARGO_PKG_VERSION"),
        config.page_size
    );

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(Bridge::new(PdfService::new(config)))
        .invoke_handler(tauri::generate_handler![
            // Operations
            merge_pdfs,
            split_pdf,
            compress_pdf,
            image_to_pdf,
            pdf_to_text,
            get_pdf_info,
            get_pdf_data,
            save_text_file,
            // Dialogs
            select_files,
            select_images,
            select_folder,
            select_save_path,
        ])
        .run(tauri::generate_context!())?;

    Ok(())
}
