//! The enhancement pipeline.
//!
//! ```text
//! bytes ─ decode ─ plan ─ denoise ─ white balance ─ local contrast
//!        ─ contrast stretch ─ resize ─ sharpen ─ saturation ─ encode ─ EncodedOutput
//! ```
//!
//! The stage order is fixed. Color and contrast corrections run at the source
//! resolution, before resizing, so they see the original noise
//! characteristics; sharpening and saturation run after resizing so the
//! resampler does not amplify their artifacts.
//!
//! The pipeline is synchronous and keeps no state between calls. Each call
//! owns its buffers, so concurrent calls need no locking. Peak memory is
//! about six full-resolution RGB buffers at the larger of the source and
//! target sizes: the stage input, its output, the `f32` color planes of the
//! current stage (three planes, each four times a byte plane), and the
//! `f32` blurred copy during sharpening.

use crate::encode::{self, EncodedOutput, OutputFormat};
use crate::error::EnhanceError;
use crate::geometry;
use crate::imaging;
use crate::options::EnhancementOptions;
use image::RgbImage;
use std::time::Instant;
use tracing::{debug, instrument};

/// One step of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Denoise,
    WhiteBalance,
    LocalContrast,
    ContrastStretch,
    Resize,
    Sharpen,
    Saturation,
}

impl Stage {
    pub const ORDER: [Stage; 7] = [
        Stage::Denoise,
        Stage::WhiteBalance,
        Stage::LocalContrast,
        Stage::ContrastStretch,
        Stage::Resize,
        Stage::Sharpen,
        Stage::Saturation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Denoise => "denoise",
            Stage::WhiteBalance => "white_balance",
            Stage::LocalContrast => "local_contrast",
            Stage::ContrastStretch => "contrast_stretch",
            Stage::Resize => "resize",
            Stage::Sharpen => "sharpen",
            Stage::Saturation => "saturation",
        }
    }

    /// Run this stage alone. `target` is only read by [`Stage::Resize`].
    pub fn apply(
        self,
        img: &RgbImage,
        options: &EnhancementOptions,
        target: (u32, u32),
    ) -> RgbImage {
        match self {
            Stage::Denoise => imaging::denoise(img, options.denoise_luma, options.denoise_color),
            Stage::WhiteBalance => imaging::white_balance(img),
            Stage::LocalContrast => imaging::local_contrast(img, options.clahe_clip),
            Stage::ContrastStretch => imaging::stretch_contrast(img),
            Stage::Resize => imaging::resize(img, target.0, target.1),
            Stage::Sharpen => {
                imaging::unsharp_mask(img, options.sharpen_amount, options.sharpen_sigma)
            }
            Stage::Saturation => imaging::adjust_saturation(img, options.saturation),
        }
    }
}

/// Decode, enhance, and encode into all four output formats.
///
/// This is the whole contract a transport adapter depends on.
pub fn enhance(input: &[u8], options: &EnhancementOptions) -> Result<EncodedOutput, EnhanceError> {
    enhance_to_formats(input, options, &OutputFormat::ALL)
}

/// Like [`enhance`], restricted to `formats`.
#[instrument(skip_all, fields(input_len = input.len()))]
pub fn enhance_to_formats(
    input: &[u8],
    options: &EnhancementOptions,
    formats: &[OutputFormat],
) -> Result<EncodedOutput, EnhanceError> {
    options.validate()?;
    enhance_validated(input, options, formats)
}

/// Run every stage on an already-decoded image.
pub fn enhance_image(
    image: RgbImage,
    options: &EnhancementOptions,
) -> Result<RgbImage, EnhanceError> {
    options.validate()?;
    run_stages(image, options)
}

/// [`enhance_to_formats`] for callers that have already validated `options`.
pub(crate) fn enhance_validated(
    input: &[u8],
    options: &EnhancementOptions,
    formats: &[OutputFormat],
) -> Result<EncodedOutput, EnhanceError> {
    let image = imaging::decode(input)?;
    let enhanced = run_stages(image, options)?;

    let started = Instant::now();
    let output = encode::encode_formats(&enhanced, formats)?;
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        formats = output.len(),
        "encode done"
    );
    Ok(output)
}

#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
fn run_stages(image: RgbImage, options: &EnhancementOptions) -> Result<RgbImage, EnhanceError> {
    let target = geometry::plan(image.width(), image.height(), options)?;
    debug!(target_w = target.0, target_h = target.1, "planned output size");

    let mut current = image;
    for stage in Stage::ORDER {
        let started = Instant::now();
        current = stage.apply(&current, options, target);
        debug!(
            stage = stage.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            width = current.width(),
            height = current.height(),
            "stage done"
        );
    }
    Ok(current)
}
