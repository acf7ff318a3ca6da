//! CLI output formatting for batch runs.
//!
//! # Input-First Display
//!
//! Every input gets a header line with its 1-based position in the argument
//! list and its file name, followed by indented context lines. Saved files
//! are listed per format with their size; a failure shows the error instead.
//!
//! ```text
//! 001 IMG_0042.jpeg → 2400×1600
//!     png: outputs/IMG_0042_enhanced.png (5.1 MB)
//!     jpg: outputs/IMG_0042_enhanced.jpg (812.4 KB)
//! 002 broken.png
//!     Error: Decode error: unrecognized image format
//!
//! Enhanced 1 of 2 images (1 failed)
//! ```
//!
//! All formatting is done by pure `format_*` functions returning lines, so
//! it can be tested without capturing stdout. The `print_*` wrappers only
//! write those lines.

use crate::batch::{BatchEvent, InputReport};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display name of an input: its file name, or the whole path if it has none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Human-readable byte count, binary units, one decimal above bytes.
///
/// ```text
/// 512        → 512 B
/// 1536       → 1.5 KB
/// 5_347_737  → 5.1 MB
/// ```
pub fn format_size(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

// ============================================================================
// Per-input output
// ============================================================================

/// Lines for a successfully enhanced input. `index` is 0-based.
pub fn format_input_report(index: usize, report: &InputReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} \u{2192} {}\u{d7}{}",
        format_index(index + 1),
        display_name(&report.source),
        report.width,
        report.height
    )];
    for file in &report.files {
        lines.push(format!(
            "{}{}: {} ({})",
            indent(1),
            file.format,
            file.path.display(),
            format_size(file.bytes)
        ));
    }
    lines
}

/// Lines for an input that failed. `index` is 0-based.
pub fn format_failure(index: usize, source: &Path, error: &str) -> Vec<String> {
    vec![
        format!("{} {}", format_index(index + 1), display_name(source)),
        format!("{}Error: {}", indent(1), error),
    ]
}

/// Lines for one progress event.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Saved { index, report } => format_input_report(*index, report),
        BatchEvent::Failed {
            index,
            source,
            error,
        } => format_failure(*index, source, error),
    }
}

/// Closing line of a batch run.
pub fn format_summary(total: usize, failed: usize) -> String {
    let done = total - failed.min(total);
    let noun = if total == 1 { "image" } else { "images" };
    if failed == 0 {
        format!("Enhanced {done} of {total} {noun}")
    } else {
        format!("Enhanced {done} of {total} {noun} ({failed} failed)")
    }
}

/// Print one progress event to stdout.
pub fn print_batch_event(event: &BatchEvent) {
    for line in format_batch_event(event) {
        println!("{}", line);
    }
}
