//! Parameter types for image encoding.
//!
//! These types describe *what* to produce, not *how*. They are the interface
//! between the [`matrix`](crate::matrix) (which decides which variants exist)
//! and the [`backend`](super::backend) (which does the pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100). Clamped on construction.
//! - [`Effort`]: AVIF encoder effort (0–9, higher = slower and smaller).
//! - [`OutputFormat`]: The three target formats and their file extensions.
//! - [`EncodeParams`]: Format plus its format-specific settings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// AVIF encoder effort (0 = fastest, 9 = slowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Effort(pub u8);

impl Effort {
    pub const MAX: u8 = 9;

    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// rav1e speed preset for this effort.
    ///
    /// rav1e speeds run 1 (slowest) to 10 (fastest); effort runs the other way.
    pub fn rav1e_speed(self) -> u8 {
        10u8.saturating_sub(self.0).clamp(1, 10)
    }
}

/// Output formats the pipeline can encode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Avif,
    Webp,
    Jpeg,
}

impl OutputFormat {
    /// Name as written in `formats = [...]`.
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Avif => "avif",
            OutputFormat::Webp => "webp",
            OutputFormat::Jpeg => "jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Avif => "avif",
            OutputFormat::Webp => "webp",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Everything an encoder needs besides the pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodeParams {
    Avif {
        quality: Quality,
        effort: Effort,
    },
    Webp {
        quality: Quality,
    },
    Jpeg {
        quality: Quality,
        progressive: bool,
        optimize_coding: bool,
    },
}

impl EncodeParams {
    pub fn format(&self) -> OutputFormat {
        match self {
            EncodeParams::Avif { .. } => OutputFormat::Avif,
            EncodeParams::Webp { .. } => OutputFormat::Webp,
            EncodeParams::Jpeg { .. } => OutputFormat::Jpeg,
        }
    }

    pub fn quality(&self) -> Quality {
        match *self {
            EncodeParams::Avif { quality, .. }
            | EncodeParams::Webp { quality }
            | EncodeParams::Jpeg { quality, .. } => quality,
        }
    }
}
