//! Per-image transcoding across the full variant matrix.
//!
//! For one source image:
//!
//! 1. Read and decode once; normalize orientation once.
//! 2. Record the display-oriented dimensions as the original size.
//! 3. For each distinct width, resize exactly once (never enlarging).
//! 4. From that shared resized image, encode every configured format and
//!    write `{base}-w{width}.{ext}` into the output directory.
//!
//! Widths are resized in parallel and each resized image fans out into
//! parallel per-format encodes via [rayon](https://docs.rs/rayon). Results
//! are sorted back into matrix order, so [`ImageResult::variants`] is
//! deterministic regardless of completion order.
//!
//! ## Failure isolation
//!
//! An unreadable source fails the whole image with
//! [`TranscodeError::SourceUnreadable`]. A failed resize or encode only
//! drops the affected variants: each is logged as a warning, recorded in
//! [`ImageResult::failures`], and the rest are still attempted. There are
//! no retries.

use crate::catalog::SourceImage;
use crate::imaging::{CodecError, Dimensions, EncodeParams, ImageCodec, OutputFormat};
use crate::matrix::{VariantMatrix, variant_file_name};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("cannot read {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

/// Why a single variant was not produced.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("resize to {width}px failed: {reason}")]
    Resize { width: u32, reason: String },
    #[error(transparent)]
    Encode(CodecError),
    #[error("cannot write output: {0}")]
    Write(#[from] std::io::Error),
}

/// Outcome of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    /// Every variant was written.
    Succeeded,
    /// Some variants were written, some failed.
    PartialFailure,
    /// Nothing was written; the image is left out of the manifest.
    Failed,
}

impl ImageStatus {
    pub fn from_counts(succeeded: usize, failed: usize) -> Self {
        match (succeeded, failed) {
            (0, _) => ImageStatus::Failed,
            (_, 0) => ImageStatus::Succeeded,
            _ => ImageStatus::PartialFailure,
        }
    }

    /// Whether the image belongs in the manifest.
    pub fn has_output(self) -> bool {
        !matches!(self, ImageStatus::Failed)
    }
}

/// A variant file that was successfully written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedVariant {
    pub source_identifier: String,
    /// Configured width; part of the file name.
    pub width: u32,
    pub format: OutputFormat,
    pub output_path: PathBuf,
    /// Actual pixel size, never wider than the original.
    pub dimensions: Dimensions,
}

/// A variant that was attempted and not written.
#[derive(Debug)]
pub struct VariantFailure {
    pub width: u32,
    pub format: OutputFormat,
    pub output_path: PathBuf,
    pub error: EncodeError,
}

#[derive(Debug)]
pub struct ImageResult {
    /// Source base name, e.g. `img_1116` for `img_1116.jpg`.
    pub identifier: String,
    pub source_path: PathBuf,
    pub original_width: u32,
    pub original_height: u32,
    /// Written variants, in matrix order.
    pub variants: Vec<GeneratedVariant>,
    pub failures: Vec<VariantFailure>,
    pub status: ImageStatus,
}

enum VariantOutcome {
    Generated(GeneratedVariant),
    Failed(VariantFailure),
}

impl VariantOutcome {
    fn key(&self) -> (u32, OutputFormat) {
        match self {
            VariantOutcome::Generated(v) => (v.width, v.format),
            VariantOutcome::Failed(f) => (f.width, f.format),
        }
    }
}

/// Produce every variant in `matrix` for one source image.
///
/// `output_dir` must already exist.
pub fn transcode<C: ImageCodec>(
    codec: &C,
    source: &SourceImage,
    matrix: &VariantMatrix,
    output_dir: &Path,
) -> Result<ImageResult, TranscodeError> {
    let unreadable = |source_err: CodecError| TranscodeError::SourceUnreadable {
        path: source.path.clone(),
        source: source_err,
    };

    let image = {
        let bytes = std::fs::read(&source.path).map_err(|e| unreadable(e.into()))?;
        let decoded = codec.decode(&bytes).map_err(unreadable)?;
        codec.normalize_orientation(decoded)
    };
    let original = codec.dimensions(&image);
    let base = source.base_name();

    let job = WidthJob {
        codec,
        image: &image,
        formats: matrix.formats(),
        identifier: base,
        output_dir,
    };

    let mut outcomes: Vec<VariantOutcome> = matrix
        .widths()
        .par_iter()
        .flat_map(|&width| job.run(width))
        .collect();

    let width_rank = |w: u32| matrix.widths().iter().position(|&x| x == w);
    outcomes.sort_by_key(|o| {
        let (width, format) = o.key();
        (width_rank(width), matrix.format_rank(format))
    });

    let mut variants = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            VariantOutcome::Generated(v) => variants.push(v),
            VariantOutcome::Failed(f) => failures.push(f),
        }
    }

    let status = ImageStatus::from_counts(variants.len(), failures.len());
    Ok(ImageResult {
        identifier: base.to_string(),
        source_path: source.path.clone(),
        original_width: original.width,
        original_height: original.height,
        variants,
        failures,
        status,
    })
}

/// Shared, read-only state for the per-width fan-out.
struct WidthJob<'a, C: ImageCodec> {
    codec: &'a C,
    image: &'a C::Image,
    formats: &'a [EncodeParams],
    identifier: &'a str,
    output_dir: &'a Path,
}

impl<C: ImageCodec> WidthJob<'_, C> {
    fn output_path(&self, width: u32, format: OutputFormat) -> PathBuf {
        self.output_dir
            .join(variant_file_name(self.identifier, width, format))
    }

    /// Resize once, then encode every format from the shared result.
    fn run(&self, width: u32) -> Vec<VariantOutcome> {
        let resized = match self.codec.resize(self.image, width) {
            Ok(resized) => resized,
            Err(e) => {
                let reason = e.to_string();
                return self
                    .formats
                    .iter()
                    .map(|params| {
                        self.fail(
                            width,
                            params.format(),
                            EncodeError::Resize {
                                width,
                                reason: reason.clone(),
                            },
                        )
                    })
                    .collect();
            }
        };

        self.formats
            .par_iter()
            .map(|params| self.encode(&resized, width, params))
            .collect()
    }

    fn encode(&self, resized: &C::Image, width: u32, params: &EncodeParams) -> VariantOutcome {
        let format = params.format();
        let output_path = self.output_path(width, format);

        let written = self
            .codec
            .encode(resized, params)
            .map_err(EncodeError::Encode)
            .and_then(|bytes| std::fs::write(&output_path, bytes).map_err(EncodeError::Write));

        match written {
            Ok(()) => VariantOutcome::Generated(GeneratedVariant {
                source_identifier: self.identifier.to_string(),
                width,
                format,
                output_path,
                dimensions: self.codec.dimensions(resized),
            }),
            Err(error) => self.fail(width, format, error),
        }
    }

    fn fail(&self, width: u32, format: OutputFormat, error: EncodeError) -> VariantOutcome {
        let output_path = self.output_path(width, format);
        tracing::warn!(
            file = %output_path.display(),
            error = %error,
            "skipping variant"
        );
        VariantOutcome::Failed(VariantFailure {
            width,
            format,
            output_path,
            error,
        })
    }
}
