//! PDF compression
//!
//! Re-encodes embedded raster images as JPEG at the requested quality and
//! deflates every other stream. The exact ratio depends on the content.

use crate::config::{CompressionQuality, ServiceConfig};
use crate::error::Result;
use crate::io;
use crate::raster::{self, PdfColor};
use image::imageops::FilterType;
use image::GenericImageView;
use lopdf::{Document, Object, ObjectId};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompressionReport {
    pub output: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
    /// Size reduction in percent, one decimal. Negative when the output grew.
    pub reduction_percent: f64,
    pub images_reencoded: usize,
}

pub fn compress_file(
    input: &Path,
    quality: CompressionQuality,
    output: &Path,
    config: &ServiceConfig,
) -> Result<CompressionReport> {
    info!("Compressing PDF: {} ({:?})", input.display(), quality);

    let bytes = io::read_input(input, config.max_input_bytes)?;
    let mut doc = io::parse_pdf(&bytes, input)?;

    let images_reencoded = compress_document(&mut doc, quality);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(|e| {
        crate::error::PdfHubError::WriteError(format!("Failed to serialize PDF: {}", e))
    })?;
    io::write_output(output, &buffer)?;

    let original_size = bytes.len() as u64;
    let compressed_size = buffer.len() as u64;
    let reduction_percent = reduction_percent(original_size, compressed_size);

    info!("Compression complete. Size reduction: {:.1}%", reduction_percent);
    info!(
        "Original: {:.2} KB, Compressed: {:.2} KB",
        original_size as f64 / 1024.0,
        compressed_size as f64 / 1024.0
    );

    Ok(CompressionReport {
        output: output.to_path_buf(),
        original_size,
        compressed_size,
        reduction_percent,
        images_reencoded,
    })
}

/// Shrink `doc` in place. Returns how many images were re-encoded.
pub fn compress_document(doc: &mut Document, quality: CompressionQuality) -> usize {
    let masks = mask_ids(doc);
    let candidates: Vec<ObjectId> = doc
        .objects
        .iter()
        .filter(|(id, obj)| is_image(obj) && !masks.contains(*id))
        .map(|(id, _)| *id)
        .collect();

    let mut reencoded = 0;
    for id in candidates {
        if reencode_image(doc, id, quality) {
            reencoded += 1;
        }
    }

    doc.prune_objects();
    doc.delete_zero_length_streams();
    doc.compress();

    debug!("Re-encoded {} images", reencoded);
    reencoded
}

fn reduction_percent(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    let pct = (original as f64 - compressed as f64) / original as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

fn is_image(obj: &Object) -> bool {
    match obj {
        Object::Stream(stream) => stream
            .dict
            .get(b"Subtype")
            .and_then(Object::as_name)
            .is_ok_and(|n| n == b"Image"),
        _ => false,
    }
}

/// Soft masks and stencil masks keep their exact pixels.
fn mask_ids(doc: &Document) -> HashSet<ObjectId> {
    doc.objects
        .values()
        .filter_map(|obj| match obj {
            Object::Stream(stream) => Some(stream),
            _ => None,
        })
        .flat_map(|stream| {
            [b"SMask".as_slice(), b"Mask".as_slice()]
                .into_iter()
                .filter_map(move |key| stream.dict.get(key).and_then(Object::as_reference).ok())
        })
        .collect()
}

fn image_color(doc: &Document, dict: &lopdf::Dictionary) -> Option<PdfColor> {
    let color_space = dict.get(b"ColorSpace").ok()?;
    let color_space = match color_space {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };

    match color_space {
        Object::Name(name) => match name.as_slice() {
            b"DeviceRGB" => Some(PdfColor::Rgb),
            b"DeviceGray" => Some(PdfColor::Gray),
            _ => None,
        },
        // [/ICCBased stream]: the channel count is all we need
        Object::Array(arr) if arr.len() == 2 && arr[0].as_name().is_ok_and(|n| n == b"ICCBased") => {
            let profile_id = arr[1].as_reference().ok()?;
            let profile = doc.get_object(profile_id).and_then(Object::as_stream).ok()?;
            match profile.dict.get(b"N").and_then(Object::as_i64).ok()? {
                1 => Some(PdfColor::Gray),
                3 => Some(PdfColor::Rgb),
                _ => None,
            }
        }
        _ => None,
    }
}

fn reencode_image(doc: &mut Document, id: ObjectId, quality: CompressionQuality) -> bool {
    let Ok(Object::Stream(stream)) = doc.get_object(id) else {
        return false;
    };

    let dict = &stream.dict;
    let is_stencil = dict
        .get(b"ImageMask")
        .and_then(Object::as_bool)
        .unwrap_or(false);
    let bits = dict.get(b"BitsPerComponent").and_then(Object::as_i64).ok();
    if is_stencil || bits != Some(8) || dict.has(b"Decode") {
        return false;
    }

    let Some(color) = image_color(doc, dict) else {
        return false;
    };
    let Some(mut img) = raster::decode_xobject(stream, color) else {
        debug!("Skipping image {:?}: undecodable", id);
        return false;
    };

    let max = quality.max_dimension();
    let (width, height) = img.dimensions();
    if width.max(height) > max {
        img = img.resize(max, max, FilterType::Lanczos3);
    }

    let Ok((jpeg, jpeg_color)) = raster::encode_jpeg(&img, quality.jpeg_quality()) else {
        return false;
    };
    if jpeg.len() >= stream.content.len() {
        debug!("Keeping image {:?}: re-encoding would not shrink it", id);
        return false;
    }

    let (new_width, new_height) = img.dimensions();
    let mut replacement = raster::image_xobject(new_width, new_height, jpeg_color, "DCTDecode", jpeg);

    // Carry over everything that does not describe the old encoding
    for (key, value) in stream.dict.iter() {
        match key.as_slice() {
            b"Width" | b"Height" | b"ColorSpace" | b"BitsPerComponent" | b"Filter"
            | b"DecodeParms" | b"Length" => {}
            _ => replacement.dict.set(key.clone(), value.clone()),
        }
    }

    debug!(
        "Image {:?}: {}x{} -> {}x{}, {} -> {} bytes",
        id,
        width,
        height,
        new_width,
        new_height,
        stream.content.len(),
        replacement.content.len()
    );
    doc.objects.insert(id, Object::Stream(replacement));
    true
}
