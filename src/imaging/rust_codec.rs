//! Production codec built on the `image` crate ecosystem.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate, format guessed from magic bytes |
//! | Orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e) |
//! | Encode → WebP | `webp` crate (libwebp, lossy) |
//! | Encode → JPEG | `jpeg-encoder` (progressive, optimized Huffman tables) |

use super::backend::{CodecError, Dimensions, ImageCodec};
use super::calculations::calculate_resize_dimensions;
use super::params::{EncodeParams, Effort, Quality};
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, GenericImageView, ImageDecoder, ImageReader};
use std::io::Cursor;

/// A decoded image plus the orientation its source declared.
///
/// The orientation is cleared once applied, so normalizing twice is a no-op.
pub struct DecodedImage {
    pixels: DynamicImage,
    orientation: Orientation,
}

/// Production codec. See the [module docs](self) for the crate mapping.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(e: impl std::fmt::Display) -> CodecError {
    CodecError::Decode(e.to_string())
}

fn encode_avif(img: &DynamicImage, quality: Quality, effort: Effort) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    let encoder = image::codecs::avif::AvifEncoder::new_with_speed_quality(
        &mut buf,
        effort.rav1e_speed(),
        quality.value() as u8,
    );
    img.write_with_encoder(encoder)
        .map_err(|e| CodecError::Encode(format!("AVIF encode failed: {}", e)))?;
    Ok(buf)
}

fn encode_webp(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError> {
    let (width, height) = img.dimensions();
    let q = quality.value() as f32;
    // `Encoder::encode` unwraps libwebp errors, so go through `encode_simple`
    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_simple(false, q)
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_simple(false, q)
    };
    let encoded =
        encoded.map_err(|e| CodecError::Encode(format!("WebP encode failed: {:?}", e)))?;
    Ok(encoded.to_vec())
}

fn encode_jpeg(
    img: &DynamicImage,
    quality: Quality,
    progressive: bool,
    optimize_coding: bool,
) -> Result<Vec<u8>, CodecError> {
    let (width, height) = img.dimensions();
    let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(CodecError::Encode(format!(
                "JPEG cannot hold {}x{} pixels",
                width, height
            )));
        }
    };

    // JPEG has no alpha channel; transparent sources are flattened
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut buf, quality.value() as u8);
    encoder.set_progressive(progressive);
    encoder.set_optimized_huffman_tables(optimize_coding);
    encoder
        .encode(rgb.as_raw(), w, h, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| CodecError::Encode(format!("JPEG encode failed: {}", e)))?;
    Ok(buf)
}

impl ImageCodec for RustCodec {
    type Image = DecodedImage;

    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, CodecError> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let mut decoder = reader.into_decoder().map_err(decode_error)?;
        // Unreadable EXIF is not fatal: the pixels are still usable as stored
        let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
        let pixels = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
        Ok(DecodedImage {
            pixels,
            orientation,
        })
    }

    fn normalize_orientation(&self, mut image: DecodedImage) -> DecodedImage {
        image.pixels.apply_orientation(image.orientation);
        image.orientation = Orientation::NoTransforms;
        image
    }

    fn dimensions(&self, image: &DecodedImage) -> Dimensions {
        let (width, height) = image.pixels.dimensions();
        Dimensions { width, height }
    }

    fn resize(&self, image: &DecodedImage, width: u32) -> Result<DecodedImage, CodecError> {
        let original = image.pixels.dimensions();
        if width == 0 {
            return Err(CodecError::Resize("target width must be non-zero".to_string()));
        }
        let (out_w, out_h) = calculate_resize_dimensions(original, width);
        let pixels = if (out_w, out_h) == original {
            image.pixels.clone()
        } else {
            image.pixels.resize_exact(out_w, out_h, FilterType::Lanczos3)
        };
        Ok(DecodedImage {
            pixels,
            orientation: image.orientation,
        })
    }

    fn encode(&self, image: &DecodedImage, params: &EncodeParams) -> Result<Vec<u8>, CodecError> {
        match *params {
            EncodeParams::Avif { quality, effort } => encode_avif(&image.pixels, quality, effort),
            EncodeParams::Webp { quality } => encode_webp(&image.pixels, quality),
            EncodeParams::Jpeg {
                quality,
                progressive,
                optimize_coding,
            } => encode_jpeg(&image.pixels, quality, progressive, optimize_coding),
        }
    }
}
