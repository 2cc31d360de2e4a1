//! Service configuration
//!
//! Defaults suit the desktop app. `ServiceConfig::from_env` lets a `.env`
//! file or the environment override them without a rebuild.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum input file size (100MB)
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 100 * 1024 * 1024;

/// Fixed page size used when placing images on pages, in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// (width, height) in points (1/72 inch)
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.0, 842.0),
            PageSize::Letter => (612.0, 792.0),
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            other => Err(format!("unknown page size '{}'", other)),
        }
    }
}

/// How aggressively `compress` re-encodes embedded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompressionQuality {
    Low,
    #[default]
    Medium,
    High,
}

impl CompressionQuality {
    pub fn jpeg_quality(self) -> u8 {
        match self {
            CompressionQuality::Low => 40,
            CompressionQuality::Medium => 60,
            CompressionQuality::High => 80,
        }
    }

    /// Longest edge, in pixels, a re-encoded image may keep.
    pub fn max_dimension(self) -> u32 {
        match self {
            CompressionQuality::Low => 1024,
            CompressionQuality::Medium => 1600,
            CompressionQuality::High => 2400,
        }
    }
}

impl FromStr for CompressionQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(CompressionQuality::Low),
            "medium" => Ok(CompressionQuality::Medium),
            "high" => Ok(CompressionQuality::High),
            other => Err(format!("unknown quality level '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub page_size: PageSize,
    /// Blank border kept around placed images, in points.
    pub page_margin: f64,
    /// JPEG quality for JPEG sources embedded by image-to-PDF.
    pub image_jpeg_quality: u8,
    pub default_quality: CompressionQuality,
    pub max_input_bytes: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            page_margin: 0.0,
            image_jpeg_quality: 90,
            default_quality: CompressionQuality::Medium,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl ServiceConfig {
    /// Build a config from `PDFHUB_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Values that fail to
    /// parse keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "PDFHUB_PAGE_SIZE") {
            config.page_size = v;
        }
        if let Some(v) = parse_var::<f64, _>(&lookup, "PDFHUB_PAGE_MARGIN") {
            if v >= 0.0 {
                config.page_margin = v;
            }
        }
        if let Some(v) = parse_var::<u8, _>(&lookup, "PDFHUB_JPEG_QUALITY") {
            config.image_jpeg_quality = v.clamp(1, 100);
        }
        if let Some(v) = parse_var(&lookup, "PDFHUB_DEFAULT_QUALITY") {
            config.default_quality = v;
        }
        if let Some(v) = parse_var::<u64, _>(&lookup, "PDFHUB_MAX_INPUT_MB") {
            config.max_input_bytes = v.saturating_mul(1024 * 1024);
        }

        config
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}
