//! File-level driver: read inputs, enhance, write outputs.
//!
//! For each input file, every requested format is written to the output
//! directory as `{stem}_enhanced.{ext}` (see [`crate::naming`]):
//!
//! ```text
//! outputs/
//! ├── IMG_0042_enhanced.png
//! ├── IMG_0042_enhanced.jpg
//! ├── IMG_0042_enhanced.webp
//! └── IMG_0042_enhanced.apng
//! ```
//!
//! ## Parallel Processing
//!
//! Inputs are processed in parallel on a dedicated [rayon](https://docs.rs/rayon)
//! pool sized by [`effective_threads`]. Each input is independent: one bad
//! file is reported in its own slot and never aborts the rest of the batch.
//! Results come back in input order regardless of completion order.
//!
//! Progress can be observed through an optional channel. Events arrive in
//! completion order.

use crate::encode::OutputFormat;
use crate::error::EnhanceError;
use crate::naming;
use crate::options::{BatchConfig, EnhancementOptions, effective_threads};
use crate::pipeline;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use tracing::{info_span, warn};

/// One file written for an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedFile {
    pub format: OutputFormat,
    pub path: PathBuf,
    /// Encoded size in bytes.
    pub bytes: usize,
}

/// Everything produced for one successfully enhanced input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputReport {
    pub source: PathBuf,
    /// Output dimensions.
    pub width: u32,
    pub height: u32,
    pub files: Vec<SavedFile>,
}

/// Progress notification, sent as each input finishes.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Saved {
        index: usize,
        report: InputReport,
    },
    Failed {
        index: usize,
        source: PathBuf,
        error: String,
    },
}

/// Outcome for one input, in the same position as the input.
pub type InputResult = (PathBuf, Result<InputReport, EnhanceError>);

/// Enhance a single file and write its outputs under `out_dir`.
///
/// Options are validated before the file is read.
pub fn process_file(
    input: &Path,
    out_dir: &Path,
    options: &EnhancementOptions,
    formats: &[OutputFormat],
) -> Result<InputReport, EnhanceError> {
    options.validate()?;
    process_file_as(input, &naming::input_stem(input), out_dir, options, formats)
}

/// `options` must already be validated.
fn process_file_as(
    input: &Path,
    stem: &str,
    out_dir: &Path,
    options: &EnhancementOptions,
    formats: &[OutputFormat],
) -> Result<InputReport, EnhanceError> {
    let bytes = std::fs::read(input)?;
    let output = pipeline::enhance_validated(&bytes, options, formats)?;

    std::fs::create_dir_all(out_dir)?;
    let mut files = Vec::with_capacity(output.len());
    for blob in output.blobs() {
        let path = out_dir.join(naming::output_file_name(stem, blob.format));
        std::fs::write(&path, &blob.bytes)?;
        files.push(SavedFile {
            format: blob.format,
            path,
            bytes: blob.bytes.len(),
        });
    }

    Ok(InputReport {
        source: input.to_path_buf(),
        width: output.width,
        height: output.height,
        files,
    })
}

/// Enhance many files in parallel.
///
/// Options are validated once before any work starts; an invalid option is
/// the only error that fails the whole batch. Per-input failures (unreadable
/// file, undecodable bytes, impossible geometry) are returned in that
/// input's slot.
pub fn process_batch(
    inputs: &[PathBuf],
    out_dir: &Path,
    options: &EnhancementOptions,
    formats: &[OutputFormat],
    config: &BatchConfig,
    progress: Option<Sender<BatchEvent>>,
) -> Result<Vec<InputResult>, EnhanceError> {
    options.validate()?;
    let stems = naming::unique_stems(inputs);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(effective_threads(config))
        .build()
        .map_err(std::io::Error::other)?;

    let results = pool.install(|| {
        inputs
            .par_iter()
            .zip(stems.par_iter())
            .enumerate()
            .map_with(progress, |tx, (index, (input, stem))| {
                let _span = info_span!("input", path = %input.display()).entered();
                let result = process_file_as(input, stem, out_dir, options, formats);
                if let Err(e) = &result {
                    warn!(error = %e, "input failed");
                }
                if let Some(tx) = tx {
                    let event = match &result {
                        Ok(report) => BatchEvent::Saved {
                            index,
                            report: report.clone(),
                        },
                        Err(e) => BatchEvent::Failed {
                            index,
                            source: input.clone(),
                            error: e.to_string(),
                        },
                    };
                    // A dropped receiver only means nobody is watching.
                    let _ = tx.send(event);
                }
                (input.clone(), result)
            })
            .collect()
    });
    Ok(results)
}
