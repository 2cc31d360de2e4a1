//! Generated PDFs and images for unit tests

use image::{ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};
use crate::raster::{self, PdfColor};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::path::{Path, PathBuf};

/// Build a PDF with one page per entry, each showing that entry as text.
/// An empty entry produces a page with no text operators.
pub fn text_pdf(pages: &[&str]) -> Vec<u8> {
    build_pdf(pages.len(), |doc, i| {
        let text = pages[i];
        let operations = if text.is_empty() {
            vec![]
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(text.as_bytes().to_vec(), StringFormat::Literal)],
                ),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        (content_id, None)
    })
}

/// Build a PDF with `num_pages` pages labelled "Page 1", "Page 2", ...
pub fn numbered_pdf(num_pages: usize) -> Vec<u8> {
    let labels: Vec<String> = (1..=num_pages).map(|n| format!("Page {}", n)).collect();
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    text_pdf(&refs)
}

/// Build a PDF whose pages each draw one uncompressed RGB image.
pub fn image_pdf(num_pages: usize, width: u32, height: u32) -> Vec<u8> {
    build_pdf(num_pages, |doc, i| {
        let pixels = gradient(width, height, i as u8).into_raw();
        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            pixels,
        );
        let image_id = doc.add_object(image);
        let content = format!("q {} 0 0 {} 0 0 cm /Im0 Do Q", width, height);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        (content_id, Some(image_id))
    })
}

/// Like `image_pdf`, but each image is Flate compressed with PNG row
/// predictors, the way PNG-derived images usually are stored.
pub fn flate_image_pdf(num_pages: usize, width: u32, height: u32) -> Vec<u8> {
    build_pdf(num_pages, |doc, i| {
        let pixels = noise(width, height, i as u32).into_raw();
        let row_len = width as usize * 3;
        let encoded = raster::zlib_compress(&png_predict(&pixels, row_len, 3)).unwrap();
        let mut image = raster::image_xobject(width, height, PdfColor::Rgb, "FlateDecode", encoded);
        image.dict.set(
            "DecodeParms",
            dictionary! { "Predictor" => 15, "Colors" => 3, "Columns" => width as i64 },
        );
        let image_id = doc.add_object(image);
        let content = format!("q {} 0 0 {} 0 0 cm /Im0 Do Q", width, height);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        (content_id, Some(image_id))
    })
}

/// PNG-filter rows of `row_len` bytes, cycling through all five filter types.
pub fn png_predict(data: &[u8], row_len: usize, bpp: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut prev = vec![0u8; row_len];
    for (r, row) in data.chunks_exact(row_len).enumerate() {
        let filter = (r % 5) as u8;
        out.push(filter);
        for i in 0..row_len {
            let left = if i >= bpp { row[i - bpp] } else { 0 };
            let up = prev[i];
            let up_left = if i >= bpp { prev[i - bpp] } else { 0 };
            let predicted = match filter {
                0 => 0,
                1 => left,
                2 => up,
                3 => ((left as u16 + up as u16) / 2) as u8,
                _ => {
                    let p = left as i16 + up as i16 - up_left as i16;
                    let (pa, pb, pc) = ((p - left as i16).abs(), (p - up as i16).abs(), (p - up_left as i16).abs());
                    if pa <= pb && pa <= pc {
                        left
                    } else if pb <= pc {
                        up
                    } else {
                        up_left
                    }
                }
            };
            out.push(row[i].wrapping_sub(predicted));
        }
        prev = row.to_vec();
    }
    out
}

fn build_pdf<F>(num_pages: usize, mut content_for: F) -> Vec<u8>
where
    F: FnMut(&mut Document, usize) -> (ObjectId, Option<ObjectId>),
{
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for i in 0..num_pages {
        let (content_id, image_id) = content_for(&mut doc, i);

        let mut resources = dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        };
        if let Some(image_id) = image_id {
            resources.set("XObject", dictionary! { "Im0" => image_id });
        }

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => num_pages as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Deterministic colour gradient so re-encoding has real content to chew on.
pub fn gradient(width: u32, height: u32, seed: u8) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            seed.wrapping_mul(40),
        ])
    })
}

/// Pseudo-random pixels that Flate cannot shrink much.
pub fn noise(width: u32, height: u32, seed: u32) -> RgbImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(12345);
    ImageBuffer::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            (state >> 16) as u8
        };
        Rgb([next(), next(), next()])
    })
}

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient(width, height, 1).save(&path).unwrap();
    path
}

pub fn write_transparent_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img: RgbaImage = ImageBuffer::from_fn(width, height, |x, _| {
        Rgba([200, 10, 10, if x % 2 == 0 { 0 } else { 255 }])
    });
    img.save(&path).unwrap();
    path
}

pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient(width, height, 2).save(&path).unwrap();
    path
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

pub fn page_count(path: &Path) -> usize {
    Document::load(path).unwrap().get_pages().len()
}
