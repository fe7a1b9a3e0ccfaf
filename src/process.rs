//! Run orchestration: every catalog image through the transcoder, then the manifest.
//!
//! ## Flow
//!
//! ```text
//! ensure output dir ──(fails → abort run)
//!   └─ for each image, hero first, one at a time:
//!        Pending → Attempting → Succeeded | PartialFailure | Failed
//!   └─ write manifest.json from the Succeeded/PartialFailure results
//! ```
//!
//! Images are processed sequentially so only one decoded source is resident
//! at a time; the concurrency lives inside [`transcode`]. Image- and
//! variant-level failures are logged and reported as [`ProcessEvent`]s, never
//! propagated. Only the output directory and the manifest are fatal.
//!
//! ## Output Structure
//!
//! ```text
//! assets/sports/
//! ├── manifest.json
//! ├── img_9050-w480.avif
//! ├── img_9050-w480.webp
//! ├── img_9050-w480.jpg
//! ├── ...
//! └── img_1211-w1600.jpg
//! ```

use crate::catalog::SourceCatalog;
use crate::imaging::{ImageCodec, RustCodec};
use crate::manifest::{Manifest, ManifestError, write_manifest};
use crate::matrix::VariantMatrix;
use crate::transcode::{ImageResult, ImageStatus, transcode};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("cannot create output directory {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write manifest: {0}")]
    Manifest(#[from] ManifestError),
}

/// Outcome of a single variant, for progress display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantStatus {
    Encoded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantInfo {
    /// Display label, e.g. "800px webp".
    pub label: String,
    pub status: VariantStatus,
}

/// Progress events emitted during processing.
///
/// Sent through an optional channel so the caller can display progress
/// without this module doing any terminal output.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    /// An image was decoded and its variants attempted.
    ImageProcessed {
        /// 1-based position in the catalog.
        index: usize,
        identifier: String,
        source_path: String,
        status: ImageStatus,
        variants: Vec<VariantInfo>,
    },
    /// An image could not be read and was skipped entirely.
    ImageSkipped {
        index: usize,
        filename: String,
        reason: String,
    },
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct ProcessResult {
    /// Images with at least one written variant, in catalog order.
    pub images: Vec<ImageResult>,
    /// Catalog filenames that produced nothing.
    pub failed: Vec<String>,
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
}

/// Run the pipeline with the production codec.
pub fn process(
    catalog: &SourceCatalog,
    matrix: &VariantMatrix,
    output_dir: &Path,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessResult, ProcessError> {
    process_with_codec(&RustCodec::new(), catalog, matrix, output_dir, events)
}

/// Run the pipeline with a specific codec (allows testing with mock).
pub fn process_with_codec(
    codec: &impl ImageCodec,
    catalog: &SourceCatalog,
    matrix: &VariantMatrix,
    output_dir: &Path,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessResult, ProcessError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ProcessError::Filesystem {
        path: output_dir.to_path_buf(),
        source,
    })?;

    tracing::info!(
        images = catalog.len(),
        variants_per_image = matrix.len(),
        output = %output_dir.display(),
        "processing catalog"
    );

    let emit = |event: ProcessEvent| {
        if let Some(tx) = &events {
            tx.send(event).ok();
        }
    };

    let mut images = Vec::new();
    let mut failed = Vec::new();

    for (i, source) in catalog.images().iter().enumerate() {
        let index = i + 1;
        let result = match transcode(codec, source, matrix, output_dir) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(file = %source.path.display(), error = %e, "skipping image");
                emit(ProcessEvent::ImageSkipped {
                    index,
                    filename: source.identifier.clone(),
                    reason: e.to_string(),
                });
                failed.push(source.identifier.clone());
                continue;
            }
        };

        emit(ProcessEvent::ImageProcessed {
            index,
            identifier: result.identifier.clone(),
            source_path: source.path.display().to_string(),
            status: result.status,
            variants: variant_infos(&result, matrix),
        });

        if result.status.has_output() {
            images.push(result);
        } else {
            tracing::warn!(file = %source.path.display(), "no variants written; leaving image out of manifest");
            failed.push(source.identifier.clone());
        }
    }

    let manifest = Manifest::from_results(matrix.widths(), &images);
    let manifest_path = write_manifest(output_dir, &manifest)?;

    tracing::info!(
        written = images.len(),
        failed = failed.len(),
        manifest = %manifest_path.display(),
        "run complete"
    );

    Ok(ProcessResult {
        images,
        failed,
        manifest,
        manifest_path,
    })
}

/// Per-variant display rows, written and failed, in matrix order.
fn variant_infos(result: &ImageResult, matrix: &VariantMatrix) -> Vec<VariantInfo> {
    let written = result.variants.iter().map(|v| {
        (
            v.width,
            v.format,
            VariantInfo {
                label: format!("{}px {}", v.width, v.format),
                status: VariantStatus::Encoded,
            },
        )
    });
    let failed = result.failures.iter().map(|f| {
        (
            f.width,
            f.format,
            VariantInfo {
                label: format!("{}px {}", f.width, f.format),
                status: VariantStatus::Failed(f.error.to_string()),
            },
        )
    });

    let mut rows: Vec<_> = written.chain(failed).collect();
    rows.sort_by_key(|(width, format, _)| (*width, matrix.format_rank(*format)));
    rows.into_iter().map(|(_, _, info)| info).collect()
}
