//! # Photo Variants
//!
//! Build-time generator of responsive image variants for a fixed set of
//! photographs. Every source image is decoded once, rotated upright from its
//! EXIF orientation, and re-encoded at each configured width in each
//! configured format. A `manifest.json` next to the variants lists the
//! original dimensions of every image that produced output.
//!
//! # Pipeline
//!
//! ```text
//! photo-variants.toml ─┐
//!   (optional)         ├─► config ─► catalog (hero + targets)
//!                      │          └► matrix  (widths × formats)
//!                      ▼
//!   for each image:  decode ─► orient ─► resize per width ─► encode per format
//!                      ▼
//!   assets/sports/{name}-w{width}.{avif|webp|jpg} + manifest.json
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `photo-variants.toml` loading, merging over stock defaults, validation |
//! | [`catalog`] | The ordered hero + target source list |
//! | [`matrix`] | Width × format enumeration and the output naming convention |
//! | [`imaging`] | Codec trait plus the production decode/orient/resize/encode backend |
//! | [`transcode`] | One image through the whole matrix, with per-variant failure isolation |
//! | [`process`] | Whole-run orchestration, progress events, manifest writing |
//! | [`manifest`] | The `manifest.json` descriptor |
//! | [`output`] | CLI output formatting for progress and the run summary |
//!
//! # Design Decisions
//!
//! ## Failure Isolation
//!
//! A broken source skips only that image. A failed encode or write loses
//! only that one variant file. The run as a whole fails only when the output
//! directory cannot be created or the manifest cannot be written.
//!
//! ## Self-Contained Imaging
//!
//! Decoding, Lanczos3 resampling and AVIF encoding come from the `image`
//! crate. Progressive JPEG uses `jpeg-encoder`. Lossy WebP uses `webp`,
//! which builds a bundled copy of libwebp. Nothing needs installing
//! system-wide: no ImageMagick, no sharp.
//!
//! ## No Incremental State
//!
//! Every run regenerates everything and overwrites in place. Nothing written
//! by a previous run is read back, so reruns over unchanged inputs produce
//! the same file set and an identical manifest.

pub mod catalog;
pub mod config;
pub mod imaging;
pub mod manifest;
pub mod matrix;
pub mod output;
pub mod process;
pub mod transcode;

#[cfg(test)]
pub(crate) mod test_helpers;
