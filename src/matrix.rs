//! The width × format matrix of variants produced for every source image.
//!
//! Building the matrix is pure and deterministic: widths in configured order,
//! and for each width the formats in declared order. Two runs over the same
//! configuration enumerate identical, identically-ordered variants.

use crate::imaging::{EncodeParams, OutputFormat};

/// One cell of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSpec {
    pub width: u32,
    pub params: EncodeParams,
}

impl VariantSpec {
    pub fn format(&self) -> OutputFormat {
        self.params.format()
    }

    /// Output filename: `{base}-w{width}.{ext}`.
    pub fn file_name(&self, base: &str) -> String {
        variant_file_name(base, self.width, self.format())
    }
}

/// `{base}-w{width}.{ext}`, e.g. `img_1116-w800.webp`.
pub fn variant_file_name(base: &str, width: u32, format: OutputFormat) -> String {
    format!("{}-w{}.{}", base, width, format.extension())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantMatrix {
    widths: Vec<u32>,
    formats: Vec<EncodeParams>,
    specs: Vec<VariantSpec>,
}

impl VariantMatrix {
    /// Repeated widths or formats keep their first occurrence only.
    pub fn new(widths: &[u32], formats: &[EncodeParams]) -> Self {
        let mut unique_widths: Vec<u32> = Vec::with_capacity(widths.len());
        for &w in widths {
            if !unique_widths.contains(&w) {
                unique_widths.push(w);
            }
        }
        let mut unique_formats: Vec<EncodeParams> = Vec::with_capacity(formats.len());
        for &p in formats {
            if !unique_formats.iter().any(|q| q.format() == p.format()) {
                unique_formats.push(p);
            }
        }
        let (widths, formats) = (unique_widths, unique_formats);

        let specs = widths
            .iter()
            .flat_map(|&width| formats.iter().map(move |&params| VariantSpec { width, params }))
            .collect();
        Self {
            widths,
            formats,
            specs,
        }
    }

    /// Every cell, width-major.
    pub fn specs(&self) -> &[VariantSpec] {
        &self.specs
    }

    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    /// Encoder settings in declared order; every width gets all of them.
    pub fn formats(&self) -> &[EncodeParams] {
        &self.formats
    }

    /// Position of a format in the declared order, for stable sorting.
    pub fn format_rank(&self, format: OutputFormat) -> usize {
        self.formats
            .iter()
            .position(|p| p.format() == format)
            .unwrap_or(self.formats.len())
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
