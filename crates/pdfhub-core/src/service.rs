//! The PDF service: one method per operation
//!
//! `PdfService` only carries its configuration. Every call opens its own
//! files and has no effect beyond the outputs it names.

use crate::compress::{self, CompressionReport};
use crate::config::{CompressionQuality, ServiceConfig};
use crate::error::Result;
use crate::info::{self, PdfInfo};
use crate::ranges::PageSelection;
use crate::{images, merge, split, text};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct PdfService {
    config: ServiceConfig,
}

impl PdfService {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn merge<P: AsRef<Path>>(&self, inputs: &[P], output: &Path) -> Result<PathBuf> {
        merge::merge_files(inputs, output, &self.config)
    }

    pub fn split(
        &self,
        input: &Path,
        selections: &[PageSelection],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        split::split_file(input, selections, output_dir, &self.config)
    }

    /// Compress with `quality`, or the configured default when `None`.
    pub fn compress(
        &self,
        input: &Path,
        quality: Option<CompressionQuality>,
        output: &Path,
    ) -> Result<CompressionReport> {
        let quality = quality.unwrap_or(self.config.default_quality);
        compress::compress_file(input, quality, output, &self.config)
    }

    pub fn images_to_pdf<P: AsRef<Path>>(&self, images: &[P], output: &Path) -> Result<PathBuf> {
        images::images_to_pdf(images, output, &self.config)
    }

    pub fn extract_text(&self, input: &Path) -> Result<String> {
        text::extract_text_file(input, &self.config)
    }

    pub fn info(&self, input: &Path) -> Result<PdfInfo> {
        info::pdf_info(input, &self.config)
    }

    pub fn data_base64(&self, input: &Path) -> Result<String> {
        info::pdf_data_base64(input, &self.config)
    }

    pub fn save_text(&self, text: &str, output: &Path) -> Result<PathBuf> {
        info::save_text(text, output)
    }
}
