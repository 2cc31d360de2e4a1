//! Image to PDF conversion
//!
//! One page per image, every page the configured fixed size, with the image
//! scaled to fit and centered.

use crate::config::ServiceConfig;
use crate::error::{PdfHubError, Result};
use crate::io;
use crate::raster::{self, PdfColor};
use image::{DynamicImage, GenericImageView, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where an image lands on its page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scale `(img_w, img_h)` to fit the page inside `margin`, keeping the
/// aspect ratio, and center it.
pub fn fit_to_page(img_w: u32, img_h: u32, page: (f64, f64), margin: f64) -> Placement {
    let (page_w, page_h) = page;
    let margin = if margin * 2.0 >= page_w.min(page_h) { 0.0 } else { margin };
    let avail_w = page_w - 2.0 * margin;
    let avail_h = page_h - 2.0 * margin;

    let img_w = img_w.max(1) as f64;
    let img_h = img_h.max(1) as f64;
    let scale = (avail_w / img_w).min(avail_h / img_h);

    let width = img_w * scale;
    let height = img_h * scale;
    Placement {
        x: (page_w - width) / 2.0,
        y: (page_h - height) / 2.0,
        width,
        height,
    }
}

pub fn images_to_pdf<P: AsRef<Path>>(
    paths: &[P],
    output: &Path,
    config: &ServiceConfig,
) -> Result<PathBuf> {
    if paths.is_empty() {
        return Err(PdfHubError::InvalidInput("No images selected".into()));
    }

    info!("Converting {} images to PDF...", paths.len());

    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        images.push(load_image(path, config)?);
        debug!("Loaded: {}", path.display());
    }

    let mut doc = build_document(images, config)?;
    io::save_pdf(&mut doc, output)?;

    info!("Successfully created PDF: {}", output.display());
    Ok(output.to_path_buf())
}

/// Decoded image plus how it should be stored in the PDF.
struct SourceImage {
    image: DynamicImage,
    format: ImageFormat,
}

fn load_image(path: &Path, config: &ServiceConfig) -> Result<SourceImage> {
    let bytes = io::read_input(path, config.max_input_bytes)?;
    let unsupported = |e: image::ImageError| {
        PdfHubError::UnsupportedFormat(format!("{} is not a readable image: {}", path.display(), e))
    };

    let format = image::guess_format(&bytes).map_err(unsupported)?;
    let image = image::load_from_memory_with_format(&bytes, format).map_err(unsupported)?;
    Ok(SourceImage { image, format })
}

fn encode_for_page(source: &SourceImage, jpeg_quality: u8) -> Result<Stream> {
    let (width, height) = source.image.dimensions();
    let stream = match source.format {
        ImageFormat::Jpeg => {
            let flattened = if source.image.color().has_alpha() {
                DynamicImage::ImageRgb8(raster::flatten_on_white(&source.image))
            } else {
                source.image.clone()
            };
            let (jpeg, color) = raster::encode_jpeg(&flattened, jpeg_quality)
                .map_err(PdfHubError::UnsupportedFormat)?;
            raster::image_xobject(width, height, color, "DCTDecode", jpeg)
        }
        _ => {
            let rgb = raster::flatten_on_white(&source.image);
            let data = raster::zlib_compress(rgb.as_raw()).map_err(PdfHubError::WriteError)?;
            raster::image_xobject(width, height, PdfColor::Rgb, "FlateDecode", data)
        }
    };
    Ok(stream)
}

fn build_document(images: Vec<SourceImage>, config: &ServiceConfig) -> Result<Document> {
    let (page_w, page_h) = config.page_size.dimensions();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(images.len());

    for source in &images {
        let (img_w, img_h) = source.image.dimensions();
        let image_id = doc.add_object(encode_for_page(source, config.image_jpeg_quality)?);
        let placement = fit_to_page(img_w, img_h, (page_w, page_h), config.page_margin);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        real(placement.width),
                        0.into(),
                        0.into(),
                        real(placement.height),
                        real(placement.x),
                        real(placement.y),
                    ],
                ),
                Operation::new("Do", vec!["Im0".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| PdfHubError::WriteError(format!("Failed to encode page content: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), real(page_w), real(page_h)],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    Ok(doc)
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}
