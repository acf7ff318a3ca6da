//! Enhancement options and batch settings.
//!
//! [`EnhancementOptions`] is built once per request from caller input and is
//! read-only afterwards. Field names match the transport-level form fields, so
//! an adapter can deserialize it straight from JSON or form data:
//!
//! ```text
//! scale            2.0     (> 0, ignored when width or height is set)
//! width            -       (optional, >= 1)
//! height           -       (optional, >= 1)
//! denoise_luma     5       (0..=20, 0 disables)
//! denoise_color    5       (0..=20, 0 disables)
//! clahe_clip       2.0     (0.5..=5.0)
//! sharpen_amount   0.6     (0..=2.0, 0 disables)
//! sharpen_sigma    1.2     (0.1..=3.0)
//! saturation       1.05    (0..=2.0, 1.0 disables)
//! ```
//!
//! Unknown fields are rejected to catch typos early.

use crate::error::EnhanceError;
use serde::{Deserialize, Serialize};

pub const DENOISE_RANGE: (u8, u8) = (0, 20);
pub const CLAHE_CLIP_RANGE: (f32, f32) = (0.5, 5.0);
pub const SHARPEN_AMOUNT_RANGE: (f32, f32) = (0.0, 2.0);
pub const SHARPEN_SIGMA_RANGE: (f32, f32) = (0.1, 3.0);
pub const SATURATION_RANGE: (f32, f32) = (0.0, 2.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnhancementOptions {
    /// Uniform upscale factor, used only when neither width nor height is set.
    pub scale: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub denoise_luma: u8,
    pub denoise_color: u8,
    pub clahe_clip: f32,
    pub sharpen_amount: f32,
    pub sharpen_sigma: f32,
    pub saturation: f32,
}

impl Default for EnhancementOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            width: None,
            height: None,
            denoise_luma: 5,
            denoise_color: 5,
            clahe_clip: 2.0,
            sharpen_amount: 0.6,
            sharpen_sigma: 1.2,
            saturation: 1.05,
        }
    }
}

/// How the output size is derived from the source size.
///
/// Setting either explicit dimension discards `scale` entirely; there is no
/// variant that combines the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeTarget {
    Scale(f32),
    Width(u32),
    Height(u32),
    Exact { width: u32, height: u32 },
}

impl EnhancementOptions {
    /// Validate every field against its documented range.
    ///
    /// `scale` is only checked when it decides the output size.
    pub fn validate(&self) -> Result<(), EnhanceError> {
        let scale_decides_size = matches!(self.resize_target(), ResizeTarget::Scale(_));
        if scale_decides_size && (!self.scale.is_finite() || self.scale <= 0.0) {
            return Err(EnhanceError::option("scale", self.scale, "> 0"));
        }
        if self.width == Some(0) {
            return Err(EnhanceError::option("width", 0, ">= 1"));
        }
        if self.height == Some(0) {
            return Err(EnhanceError::option("height", 0, ">= 1"));
        }
        if self.denoise_luma > DENOISE_RANGE.1 {
            return Err(EnhanceError::option(
                "denoise_luma",
                self.denoise_luma,
                "0..=20",
            ));
        }
        if self.denoise_color > DENOISE_RANGE.1 {
            return Err(EnhanceError::option(
                "denoise_color",
                self.denoise_color,
                "0..=20",
            ));
        }
        check_range("clahe_clip", self.clahe_clip, CLAHE_CLIP_RANGE, "0.5..=5.0")?;
        check_range(
            "sharpen_amount",
            self.sharpen_amount,
            SHARPEN_AMOUNT_RANGE,
            "0..=2.0",
        )?;
        check_range(
            "sharpen_sigma",
            self.sharpen_sigma,
            SHARPEN_SIGMA_RANGE,
            "0.1..=3.0",
        )?;
        check_range("saturation", self.saturation, SATURATION_RANGE, "0..=2.0")?;
        Ok(())
    }

    pub fn resize_target(&self) -> ResizeTarget {
        match (self.width, self.height) {
            (Some(width), Some(height)) => ResizeTarget::Exact { width, height },
            (Some(width), None) => ResizeTarget::Width(width),
            (None, Some(height)) => ResizeTarget::Height(height),
            (None, None) => ResizeTarget::Scale(self.scale),
        }
    }
}

fn check_range(
    name: &'static str,
    value: f32,
    (lo, hi): (f32, f32),
    label: &'static str,
) -> Result<(), EnhanceError> {
    // NaN fails both comparisons, so test for containment rather than exclusion.
    if value >= lo && value <= hi {
        Ok(())
    } else {
        Err(EnhanceError::option(name, value, label))
    }
}

/// Worker settings for batch runs in the CLI adapter.
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Maximum number of inputs processed at once.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective worker count.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, never below 1
pub fn effective_threads(config: &BatchConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_threads
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}
