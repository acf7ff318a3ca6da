//! Output file naming.
//!
//! Every saved file follows one pattern, derived from the input's file stem:
//!
//! - `photos/IMG_0042.jpeg` + `png` → `IMG_0042_enhanced.png`
//! - `scan.tiff` + `apng` → `scan_enhanced.apng`
//! - `.hidden` + `jpg` → `.hidden_enhanced.jpg`
//!
//! Inputs without a usable stem (`/`, `..`, an empty path) fall back to
//! `image`, so the output directory never receives a file named only
//! `_enhanced.png`.

use crate::encode::OutputFormat;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Stem used when the input path has none.
pub const FALLBACK_STEM: &str = "image";
/// Inserted between the stem and the extension.
pub const SUFFIX: &str = "_enhanced";

/// File stem of `path`, or [`FALLBACK_STEM`].
pub fn input_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_STEM.to_string())
}

/// `{stem}_enhanced.{ext}` for one output format.
pub fn output_file_name(stem: &str, format: OutputFormat) -> String {
    format!("{stem}{SUFFIX}.{}", format.extension())
}

/// Stems for a batch of inputs sharing one output directory.
///
/// Repeated stems get `-2`, `-3`, ... in input order, so `a/x.png` and
/// `b/x.jpg` write `x_enhanced.*` and `x-2_enhanced.*` instead of
/// overwriting each other.
pub fn unique_stems(paths: &[PathBuf]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    paths
        .iter()
        .map(|path| {
            let stem = input_stem(path);
            let count = seen.entry(stem.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                stem
            } else {
                format!("{stem}-{count}")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directory_and_extension() {
        assert_eq!(input_stem(Path::new("photos/IMG_0042.jpeg")), "IMG_0042");
    }

    #[test]
    fn keeps_inner_dots() {
        assert_eq!(input_stem(Path::new("holiday.2024.png")), "holiday.2024");
    }

    #[test]
    fn dotfile_is_its_own_stem() {
        assert_eq!(input_stem(Path::new(".hidden")), ".hidden");
    }

    #[test]
    fn missing_stem_falls_back() {
        assert_eq!(input_stem(Path::new("")), FALLBACK_STEM);
        assert_eq!(input_stem(Path::new("/")), FALLBACK_STEM);
        assert_eq!(input_stem(Path::new("..")), FALLBACK_STEM);
    }

    #[test]
    fn file_name_per_format() {
        assert_eq!(output_file_name("scan", OutputFormat::Png), "scan_enhanced.png");
        assert_eq!(output_file_name("scan", OutputFormat::Jpg), "scan_enhanced.jpg");
        assert_eq!(
            output_file_name("scan", OutputFormat::Webp),
            "scan_enhanced.webp"
        );
        assert_eq!(
            output_file_name("scan", OutputFormat::Apng),
            "scan_enhanced.apng"
        );
    }

    #[test]
    fn unique_stems_number_repeats_in_order() {
        let paths: Vec<PathBuf> = ["a/x.png", "b/x.jpg", "y.png", "c/x.webp"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(unique_stems(&paths), ["x", "x-2", "y", "x-3"]);
    }

    #[test]
    fn unique_stems_leave_distinct_names_alone() {
        let paths = vec![PathBuf::from("one.png"), PathBuf::from("two.png")];
        assert_eq!(unique_stems(&paths), ["one", "two"]);
    }
}
