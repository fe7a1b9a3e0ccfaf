//! The manifest descriptor written next to the generated variants.
//!
//! ```json
//! {
//!   "widths": [480, 800, 1280, 1600],
//!   "images": [
//!     { "identifier": "img_9050", "width": 2000, "height": 1500 }
//!   ]
//! }
//! ```
//!
//! Only images with at least one written variant are listed. Per-variant
//! paths are implied by the `{identifier}-w{width}.{ext}` naming convention
//! and are not enumerated. Writing overwrites any previous manifest, and the
//! same inputs always produce the same field values.

use crate::transcode::ImageResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the manifest file within the output directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// The configured width list, verbatim.
    pub widths: Vec<u32>,
    pub images: Vec<ManifestImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestImage {
    pub identifier: String,
    /// Display-oriented original width.
    pub width: u32,
    /// Display-oriented original height.
    pub height: u32,
}

impl Manifest {
    /// Build from run results, keeping images that produced any output.
    pub fn from_results(widths: &[u32], results: &[ImageResult]) -> Self {
        Self {
            widths: widths.to_vec(),
            images: results
                .iter()
                .filter(|r| r.status.has_output())
                .map(|r| ManifestImage {
                    identifier: r.identifier.clone(),
                    width: r.original_width,
                    height: r.original_height,
                })
                .collect(),
        }
    }
}

/// Serialize `manifest` to `<output_dir>/manifest.json`, replacing any old one.
pub fn write_manifest(output_dir: &Path, manifest: &Manifest) -> Result<PathBuf, ManifestError> {
    let path = output_dir.join(MANIFEST_FILENAME);
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
