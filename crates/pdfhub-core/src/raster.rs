//! Raster image helpers shared by compress and image-to-PDF

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use lopdf::{Dictionary, Object, Stream};
use std::io::{Read, Write};

/// Pixel layout of a PDF image XObject that we know how to rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfColor {
    Gray,
    Rgb,
}

impl PdfColor {
    pub fn components(self) -> usize {
        match self {
            PdfColor::Gray => 1,
            PdfColor::Rgb => 3,
        }
    }

    pub fn color_space(self) -> &'static str {
        match self {
            PdfColor::Gray => "DeviceGray",
            PdfColor::Rgb => "DeviceRGB",
        }
    }
}

/// Encode as baseline JPEG, keeping grayscale images single-channel.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<(Vec<u8>, PdfColor), String> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    let (width, height) = img.dimensions();

    let color = if is_grayscale(img) {
        let gray = img.to_luma8();
        encoder
            .encode(gray.as_raw(), width, height, ColorType::L8)
            .map_err(|e| format!("Failed to encode JPEG: {}", e))?;
        PdfColor::Gray
    } else {
        let rgb = img.to_rgb8();
        encoder
            .encode(rgb.as_raw(), width, height, ColorType::Rgb8)
            .map_err(|e| format!("Failed to encode JPEG: {}", e))?;
        PdfColor::Rgb
    };

    Ok((bytes, color))
}

fn is_grayscale(img: &DynamicImage) -> bool {
    matches!(
        img,
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageLuma16(_)
    )
}

/// Composite any alpha channel onto white and return 8-bit RGB.
pub fn flatten_on_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

pub fn zlib_compress(data: &[u8]) -> Result<Vec<u8>, String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| format!("Failed to deflate image data: {}", e))
}

/// Image XObject stream for already-encoded data.
pub fn image_xobject(
    width: u32,
    height: u32,
    color: PdfColor,
    filter: &str,
    data: Vec<u8>,
) -> Stream {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(color.color_space().as_bytes().to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
    Stream::new(dict, data).with_compression(false)
}

/// Decode the pixels of an image XObject.
///
/// Only 8-bit gray/RGB images stored raw, Flate compressed (optionally with
/// PNG predictors) or as JPEG are understood; anything else yields `None`
/// so the caller leaves it be.
pub fn decode_xobject(stream: &Stream, color: PdfColor) -> Option<DynamicImage> {
    let width = dimension(stream, b"Width")?;
    let height = dimension(stream, b"Height")?;

    let filters = filter_names(stream);
    match filters.as_slice() {
        [f] if f == "DCTDecode" => {
            let img = image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg).ok()?;
            // The dictionary and the JPEG header must agree
            (img.dimensions() == (width, height)).then_some(img)
        }
        [] => raw_to_image(&stream.content, width, height, color),
        [f] if f == "FlateDecode" => {
            let inflated = inflate(&stream.content)?;
            let data = match predictor_params(stream)? {
                Some(params) => unpredict_png(&inflated, &params)?,
                None => inflated,
            };
            raw_to_image(&data, width, height, color)
        }
        _ => None,
    }
}

fn dimension(stream: &Stream, key: &[u8]) -> Option<u32> {
    let value = stream.dict.get(key).and_then(Object::as_i64).ok()?;
    u32::try_from(value).ok().filter(|&v| v > 0)
}

fn inflate(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(data).read_to_end(&mut out).ok()?;
    Some(out)
}

/// `/DecodeParms` of a Flate stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PredictorParams {
    colors: usize,
    columns: usize,
}

/// `Some(None)` when no predictor applies, `None` for predictors we cannot undo.
fn predictor_params(stream: &Stream) -> Option<Option<PredictorParams>> {
    let params = match stream.dict.get(b"DecodeParms") {
        Err(_) | Ok(Object::Null) => return Some(None),
        Ok(Object::Dictionary(d)) => d,
        Ok(Object::Array(arr)) => match arr.first() {
            Some(Object::Dictionary(d)) => d,
            Some(Object::Null) | None => return Some(None),
            _ => return None,
        },
        _ => return None,
    };

    let int = |key: &[u8], default: i64| params.get(key).and_then(Object::as_i64).unwrap_or(default);
    let (predictor, bits) = (int(b"Predictor".as_slice(), 1), int(b"BitsPerComponent".as_slice(), 8));
    match predictor {
        1 => Some(None),
        10..=15 => {
            if bits != 8 {
                return None;
            }
            let colors = usize::try_from(int(b"Colors".as_slice(), 1)).ok().filter(|&c| c > 0)?;
            let columns = usize::try_from(int(b"Columns".as_slice(), 1)).ok().filter(|&c| c > 0)?;
            Some(Some(PredictorParams { colors, columns }))
        }
        // TIFF predictor 2 and unknown values
        _ => None,
    }
}

/// Undo PNG row filters: each row is one filter-type byte plus the row bytes.
fn unpredict_png(data: &[u8], params: &PredictorParams) -> Option<Vec<u8>> {
    let bpp = params.colors;
    let row_len = params.colors.checked_mul(params.columns)?;
    let stride = row_len.checked_add(1)?;

    let mut out = Vec::with_capacity(data.len() / stride * row_len);
    let mut prev = vec![0u8; row_len];
    for row in data.chunks_exact(stride) {
        let (filter, encoded) = (row[0], &row[1..]);
        let mut current = vec![0u8; row_len];
        for i in 0..row_len {
            let left = if i >= bpp { current[i - bpp] } else { 0 };
            let up = prev[i];
            let up_left = if i >= bpp { prev[i - bpp] } else { 0 };
            let predicted = match filter {
                0 => 0,
                1 => left,
                2 => up,
                3 => ((left as u16 + up as u16) / 2) as u8,
                4 => paeth(left, up, up_left),
                _ => return None,
            };
            current[i] = encoded[i].wrapping_add(predicted);
        }
        out.extend_from_slice(&current);
        prev = current;
    }
    Some(out)
}

fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

fn raw_to_image(data: &[u8], width: u32, height: u32, color: PdfColor) -> Option<DynamicImage> {
    let expected = (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(color.components())?;
    if data.len() < expected {
        return None;
    }
    let pixels = data[..expected].to_vec();
    match color {
        PdfColor::Gray => image::GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8),
        PdfColor::Rgb => RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
    }
}

/// Filter names applied to a stream, in order.
pub fn filter_names(stream: &Stream) -> Vec<String> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(n)) => vec![String::from_utf8_lossy(n).to_string()],
        Ok(Object::Array(arr)) => arr
            .iter()
            .filter_map(|f| match f {
                Object::Name(n) => Some(String::from_utf8_lossy(n).to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
