//! CLI output formatting.
//!
//! A run prints two blocks: the resolved arguments before any image is
//! opened, and the written path once the JPEG is on disk.
//!
//! ```text
//! Inputs
//! 001 shots/a6000.jpg
//! 002 shots/x100.jpg
//! Output
//!     cmp.jpg
//! Info
//!     fstop, iso
//! Crop
//!     (2500, 1500)-(3500, 2000) [1000x500]
//! Quality
//!     90
//!
//! Saved to cmp_rust.jpg
//! ```
//!
//! # Architecture
//!
//! Each block has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::compare::ComparisonRequest;
use crate::config::CompareConfig;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// A heading followed by one indented value line.
fn section(lines: &mut Vec<String>, title: &str, value: impl std::fmt::Display) {
    lines.push(title.to_string());
    lines.push(format!("{}{}", indent(1), value));
}

/// Format the resolved arguments of a run.
pub fn format_arguments(request: &ComparisonRequest, config: &CompareConfig) -> Vec<String> {
    let mut lines = vec!["Inputs".to_string()];
    for (i, input) in request.inputs.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), input.display()));
    }

    section(&mut lines, "Output", request.output.display());

    let info = if request.fields.is_empty() {
        "none".to_string()
    } else {
        request
            .fields
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    };
    section(&mut lines, "Info", info);
    section(&mut lines, "Crop", config.crop);
    section(&mut lines, "Quality", config.output.quality);
    lines
}

/// Print the resolved arguments to stdout.
pub fn print_arguments(request: &ComparisonRequest, config: &CompareConfig) {
    for line in format_arguments(request, config) {
        println!("{}", line);
    }
}

pub fn format_saved(path: &Path) -> String {
    format!("Saved to {}", path.display())
}

pub fn print_saved(path: &Path) {
    println!();
    println!("{}", format_saved(path));
}
