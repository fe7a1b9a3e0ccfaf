//! CLI output formatting for the pipeline run.
//!
//! # Information-First Display
//!
//! Every image leads with its positional index and identifier, with the
//! source path and per-variant outcomes as indented context lines. Failures
//! are shown inline next to the variants that did succeed, so a partially
//! processed image reads as one block.
//!
//! # Output Format
//!
//! ```text
//! 001 img_9050
//!     Source: src/sports/img_9050.jpg
//!     480px avif: encoded
//!     480px webp: encoded
//!     480px jpg: FAILED (encoding failed: ...)
//!     ...
//! 002 img_1116.jpg: SKIPPED
//!     Reason: cannot read source src/sports/img_1116.jpg: ...
//!
//! Wrote 8 images (96 variants) to assets/sports
//! Failed: img_1116.jpg
//! Manifest: assets/sports/manifest.json
//! ```
//!
//! # Architecture
//!
//! Each piece has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::process::{ProcessEvent, ProcessResult, VariantStatus};
use crate::transcode::ImageStatus;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::ImageProcessed {
            index,
            identifier,
            source_path,
            status,
            variants,
        } => {
            let mut lines = Vec::new();
            let header = match status {
                ImageStatus::Succeeded => format!("{} {}", format_index(*index), identifier),
                ImageStatus::PartialFailure => {
                    format!("{} {} (partial)", format_index(*index), identifier)
                }
                ImageStatus::Failed => format!("{} {}: FAILED", format_index(*index), identifier),
            };
            lines.push(header);
            lines.push(format!("{}Source: {}", indent(1), source_path));

            for variant in variants {
                let status_str = match &variant.status {
                    VariantStatus::Encoded => "encoded".to_string(),
                    VariantStatus::Failed(reason) => format!("FAILED ({})", reason),
                };
                lines.push(format!("{}{}: {}", indent(1), variant.label, status_str));
            }
            lines
        }
        ProcessEvent::ImageSkipped {
            index,
            filename,
            reason,
        } => vec![
            format!("{} {}: SKIPPED", format_index(*index), filename),
            format!("{}Reason: {}", indent(1), reason),
        ],
    }
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

/// Format the end-of-run summary.
pub fn format_summary(result: &ProcessResult, output_dir: &Path) -> Vec<String> {
    let variant_count: usize = result.images.iter().map(|r| r.variants.len()).sum();
    let partial = result
        .images
        .iter()
        .filter(|r| r.status == ImageStatus::PartialFailure)
        .count();

    let mut lines = vec![String::new()];
    let image_word = if result.images.len() == 1 {
        "image"
    } else {
        "images"
    };
    let mut wrote = format!(
        "Wrote {} {} ({} variants) to {}",
        result.images.len(),
        image_word,
        variant_count,
        output_dir.display()
    );
    if partial > 0 {
        wrote.push_str(&format!(", {} with missing variants", partial));
    }
    lines.push(wrote);

    if !result.failed.is_empty() {
        lines.push(format!("Failed: {}", result.failed.join(", ")));
    }
    lines.push(format!("Manifest: {}", result.manifest_path.display()));
    lines
}

pub fn print_summary(result: &ProcessResult, output_dir: &Path) {
    for line in format_summary(result, output_dir) {
        println!("{}", line);
    }
}
