//! Pipeline configuration module.
//!
//! Handles loading, validating, and merging `photo-variants.toml`. Stock
//! defaults describe the reference setup; an optional file in the working
//! directory overrides any subset of them. There are no runtime flags and no
//! environment-variable inputs.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dir = "src/sports"     # Where the source photographs live
//! output_dir = "assets/sports"  # Variants and manifest.json go here
//!
//! hero = "img_9050.jpg"         # Processed first
//! targets = ["img_1116.jpg", "img_1128.jpg", ...]
//!
//! widths = [480, 800, 1280, 1600]   # Strictly ascending
//! formats = ["avif", "webp", "jpeg"] # Encode order per width
//!
//! [avif]
//! quality = 45
//! effort = 4                    # 0 (fast) .. 9 (slow, smaller)
//!
//! [webp]
//! quality = 70
//!
//! [jpeg]
//! quality = 75
//! progressive = true
//! optimize_coding = true
//!
//! [processing]
//! max_processes = 4             # Max parallel encodes (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! widths = [640, 1280]
//!
//! [webp]
//! quality = 80
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::catalog::{SourceCatalog, SourceImage};
use crate::imaging::{EncodeParams, Effort, OutputFormat, Quality};
use crate::matrix::VariantMatrix;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "photo-variants.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from `photo-variants.toml`.
///
/// All fields have defaults matching the reference setup. Unknown keys are
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directory holding the source photographs.
    pub source_dir: PathBuf,
    /// Directory receiving variant files and the manifest (created if absent).
    pub output_dir: PathBuf,
    /// Hero image filename; always processed first.
    pub hero: String,
    /// Remaining image filenames, in processing order.
    pub targets: Vec<String>,
    /// Output widths in pixels, strictly ascending.
    pub widths: Vec<u32>,
    /// Output formats, in per-width encode order.
    pub formats: Vec<OutputFormat>,
    pub avif: AvifConfig,
    pub webp: WebpConfig,
    pub jpeg: JpegConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src/sports"),
            output_dir: PathBuf::from("assets/sports"),
            hero: "img_9050.jpg".to_string(),
            targets: [
                "img_1116.jpg",
                "img_1128.jpg",
                "img_1165.jpg",
                "img_1171.jpg",
                "img_1175.jpg",
                "img_1194.jpg",
                "img_1208.jpg",
                "img_1211.jpg",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            widths: vec![480, 800, 1280, 1600],
            formats: vec![OutputFormat::Avif, OutputFormat::Webp, OutputFormat::Jpeg],
            avif: AvifConfig::default(),
            webp: WebpConfig::default(),
            jpeg: JpegConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.widths.is_empty() {
            return Err(ConfigError::Validation("widths must not be empty".into()));
        }
        if self.widths.contains(&0) {
            return Err(ConfigError::Validation("widths must be non-zero".into()));
        }
        if !self.widths.windows(2).all(|w| w[0] < w[1]) {
            return Err(ConfigError::Validation(
                "widths must be strictly ascending".into(),
            ));
        }
        if self.formats.is_empty() {
            return Err(ConfigError::Validation("formats must not be empty".into()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.formats.iter().find(|f| !seen.insert(**f)) {
            return Err(ConfigError::Validation(format!(
                "formats lists \"{}\" more than once",
                dup.name()
            )));
        }
        for (name, quality) in [
            ("avif.quality", self.avif.quality),
            ("webp.quality", self.webp.quality),
            ("jpeg.quality", self.jpeg.quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::Validation(format!("{name} must be 1-100")));
            }
        }
        if self.avif.effort > Effort::MAX {
            return Err(ConfigError::Validation(format!(
                "avif.effort must be 0-{}",
                Effort::MAX
            )));
        }
        if self.hero.is_empty() || self.targets.iter().any(String::is_empty) {
            return Err(ConfigError::Validation(
                "image filenames must not be empty".into(),
            ));
        }

        // Two sources with the same base name would write the same variant paths
        let catalog = self.catalog();
        let mut bases = HashSet::new();
        if let Some(clash) = catalog
            .images()
            .iter()
            .map(SourceImage::base_name)
            .find(|base| !bases.insert(*base))
        {
            return Err(ConfigError::Validation(format!(
                "more than one source image named '{clash}'"
            )));
        }
        Ok(())
    }

    /// Encoder settings for each configured format, in declared order.
    pub fn encode_params(&self) -> Vec<EncodeParams> {
        self.formats
            .iter()
            .map(|format| match format {
                OutputFormat::Avif => EncodeParams::Avif {
                    quality: Quality::new(self.avif.quality),
                    effort: Effort::new(self.avif.effort),
                },
                OutputFormat::Webp => EncodeParams::Webp {
                    quality: Quality::new(self.webp.quality),
                },
                OutputFormat::Jpeg => EncodeParams::Jpeg {
                    quality: Quality::new(self.jpeg.quality),
                    progressive: self.jpeg.progressive,
                    optimize_coding: self.jpeg.optimize_coding,
                },
            })
            .collect()
    }

    pub fn matrix(&self) -> VariantMatrix {
        VariantMatrix::new(&self.widths, &self.encode_params())
    }

    pub fn catalog(&self) -> SourceCatalog {
        SourceCatalog::new(&self.source_dir, &self.hero, &self.targets)
    }
}

/// AVIF encoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvifConfig {
    pub quality: u32,
    /// 0 = fastest, 9 = slowest and smallest.
    pub effort: u8,
}

impl Default for AvifConfig {
    fn default() -> Self {
        Self {
            quality: 45,
            effort: 4,
        }
    }
}

/// WebP encoder settings (lossy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebpConfig {
    pub quality: u32,
}

impl Default for WebpConfig {
    fn default() -> Self {
        Self { quality: 70 }
    }
}

/// JPEG encoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JpegConfig {
    pub quality: u32,
    /// Multi-scan progressive JPEG.
    pub progressive: bool,
    /// Optimized Huffman tables (smaller files, slower encode).
    pub optimize_coding: bool,
}

impl Default for JpegConfig {
    fn default() -> Self {
        Self {
            quality: 75,
            progressive: true,
            optimize_coding: true,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel encode workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(PipelineConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `photo-variants.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PipelineConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PipelineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `photo-variants.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<PipelineConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `photo-variants.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-variants configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as photo-variants.toml in the directory you run from.
# Unknown keys will cause an error.

# Directory holding the source photographs.
source_dir = "src/sports"

# Directory receiving the variants and manifest.json (created if absent).
output_dir = "assets/sports"

# ---------------------------------------------------------------------------
# Source images
# ---------------------------------------------------------------------------
# The hero image is processed first; targets follow in the order listed.
hero = "img_9050.jpg"
targets = [
    "img_1116.jpg",
    "img_1128.jpg",
    "img_1165.jpg",
    "img_1171.jpg",
    "img_1175.jpg",
    "img_1194.jpg",
    "img_1208.jpg",
    "img_1211.jpg",
]

# ---------------------------------------------------------------------------
# Variant matrix
# ---------------------------------------------------------------------------
# Output widths in pixels, strictly ascending. Sources narrower than a width
# are never enlarged; that variant keeps the source width.
widths = [480, 800, 1280, 1600]

# Formats encoded for every width, in this order.
# Files are named {name}-w{width}.{avif|webp|jpg}.
formats = ["avif", "webp", "jpeg"]

[avif]
quality = 45
# Encoder effort: 0 = fastest, 9 = slowest and smallest.
effort = 4

[webp]
quality = 70

[jpeg]
quality = 75
progressive = true
# Optimized Huffman tables: smaller files, slower encode.
optimize_coding = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel encode workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
