//! Shared test utilities for the photo-variants test suite.
//!
//! Provides synthetic source images (real JPEG bytes for [`RustCodec`] tests,
//! dimension text for [`MockCodec`] tests) and catalog/matrix fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_mock_source(&tmp.path().join("a.jpg"), "2000x1500");
//! let catalog = catalog_of(tmp.path(), &["a.jpg"]);
//! ```
//!
//! [`RustCodec`]: crate::imaging::RustCodec
//! [`MockCodec`]: crate::imaging::backend::tests::MockCodec

use image::{ImageEncoder, RgbImage};
use std::path::Path;

use crate::catalog::SourceCatalog;
use crate::imaging::{EncodeParams, Effort, Quality};
use crate::matrix::VariantMatrix;

// =========================================================================
// Synthetic images
// =========================================================================

/// Encode a gradient JPEG with the given dimensions.
pub fn encode_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Insert an EXIF APP1 segment carrying `orientation` right after SOI.
///
/// The TIFF block is big-endian with a single IFD0 entry (tag 0x0112).
pub fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG");

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\0\x2A");
    tiff.extend_from_slice(&8u32.to_be_bytes()); // IFD0 offset
    tiff.extend_from_slice(&1u16.to_be_bytes()); // entry count
    tiff.extend_from_slice(&0x0112u16.to_be_bytes()); // Orientation
    tiff.extend_from_slice(&3u16.to_be_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_be_bytes()); // count
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]); // value padding
    tiff.extend_from_slice(&0u32.to_be_bytes()); // no next IFD

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Write a synthetic JPEG to disk, creating parent directories.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, encode_test_jpeg(width, height)).unwrap();
}

/// Write a mock source file (`"WxH"` or `"WxH;rot90"`).
pub fn write_mock_source(path: &Path, spec: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, spec).unwrap();
}

// =========================================================================
// Fixtures
// =========================================================================

/// Catalog over `dir` whose first filename is the hero.
pub fn catalog_of(dir: &Path, filenames: &[&str]) -> SourceCatalog {
    let (hero, targets) = filenames.split_first().expect("at least one filename");
    let targets: Vec<String> = targets.iter().map(|s| s.to_string()).collect();
    SourceCatalog::new(dir, hero, &targets)
}

/// The reference encoder settings: AVIF q45/e4, WebP q70, progressive JPEG q75.
pub fn reference_formats() -> Vec<EncodeParams> {
    vec![
        EncodeParams::Avif {
            quality: Quality::new(45),
            effort: Effort::new(4),
        },
        EncodeParams::Webp {
            quality: Quality::new(70),
        },
        EncodeParams::Jpeg {
            quality: Quality::new(75),
            progressive: true,
            optimize_coding: true,
        },
    ]
}

/// The reference 4 widths × 3 formats matrix.
pub fn reference_matrix() -> VariantMatrix {
    VariantMatrix::new(&[480, 800, 1280, 1600], &reference_formats())
}
