//! Target size planning.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::error::EnhanceError;
use crate::options::{EnhancementOptions, ResizeTarget};

/// Largest output side accepted by the planner.
pub const MAX_DIMENSION: u32 = 32_768;

/// Largest output area accepted by the planner (100 megapixels).
///
/// Every stage after the resize works on buffers of this size, and the
/// sharpening stage holds an `f32` copy at 12 bytes per pixel.
pub const MAX_PIXELS: u64 = 100_000_000;

/// Compute output dimensions from source dimensions and options.
///
/// - width and height both set → used verbatim, aspect ratio not enforced
/// - only width set → height follows the source aspect ratio
/// - only height set → width follows the source aspect ratio
/// - neither set → both sides multiplied by `scale`
///
/// # Examples
/// ```
/// # use image_enhancer::geometry::plan;
/// # use image_enhancer::EnhancementOptions;
/// let opts = EnhancementOptions { width: Some(200), ..Default::default() };
/// assert_eq!(plan(100, 50, &opts).unwrap(), (200, 100));
///
/// let opts = EnhancementOptions { scale: 3.0, ..Default::default() };
/// assert_eq!(plan(100, 50, &opts).unwrap(), (300, 150));
/// ```
pub fn plan(
    source_w: u32,
    source_h: u32,
    options: &EnhancementOptions,
) -> Result<(u32, u32), EnhanceError> {
    plan_target(source_w, source_h, options.resize_target())
}

pub fn plan_target(
    source_w: u32,
    source_h: u32,
    target: ResizeTarget,
) -> Result<(u32, u32), EnhanceError> {
    if source_w == 0 || source_h == 0 {
        return Err(EnhanceError::InvalidGeometry {
            width: source_w as i64,
            height: source_h as i64,
        });
    }
    let (src_w, src_h) = (source_w as f64, source_h as f64);

    let (w, h) = match target {
        ResizeTarget::Exact { width, height } => (width as f64, height as f64),
        ResizeTarget::Width(width) => (width as f64, (width as f64 * src_h / src_w).round()),
        ResizeTarget::Height(height) => ((height as f64 * src_w / src_h).round(), height as f64),
        ResizeTarget::Scale(scale) => (
            (src_w * scale as f64).round(),
            (src_h * scale as f64).round(),
        ),
    };

    let in_range = |v: f64| v.is_finite() && v >= 1.0 && v <= MAX_DIMENSION as f64;
    if !in_range(w) || !in_range(h) {
        return Err(EnhanceError::InvalidGeometry {
            width: saturate(w),
            height: saturate(h),
        });
    }
    let (w, h) = (w as u32, h as u32);
    if w as u64 * h as u64 > MAX_PIXELS {
        return Err(EnhanceError::InvalidGeometry {
            width: w as i64,
            height: h as i64,
        });
    }
    Ok((w, h))
}

fn saturate(v: f64) -> i64 {
    if v.is_nan() { 0 } else { v as i64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts_width(w: u32) -> EnhancementOptions {
        EnhancementOptions {
            width: Some(w),
            ..Default::default()
        }
    }

    #[test]
    fn width_only_preserves_aspect() {
        assert_eq!(plan(100, 50, &opts_width(200)).unwrap(), (200, 100));
    }

    #[test]
    fn height_only_preserves_aspect() {
        let opts = EnhancementOptions {
            height: Some(25),
            ..Default::default()
        };
        assert_eq!(plan(100, 50, &opts).unwrap(), (50, 25));
    }

    #[test]
    fn scale_multiplies_both_sides() {
        let opts = EnhancementOptions {
            scale: 3.0,
            ..Default::default()
        };
        assert_eq!(plan(100, 50, &opts).unwrap(), (300, 150));
    }

    #[test]
    fn both_sides_used_verbatim() {
        let opts = EnhancementOptions {
            width: Some(10),
            height: Some(10),
            ..Default::default()
        };
        assert_eq!(plan(100, 50, &opts).unwrap(), (10, 10));
    }

    #[test]
    fn default_scale_doubles() {
        assert_eq!(
            plan(100, 100, &EnhancementOptions::default()).unwrap(),
            (200, 200)
        );
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // 3 * 50 / 100 = 1.5 → 2
        assert_eq!(plan(100, 50, &opts_width(3)).unwrap(), (3, 2));
        // 0.5 scale of 5px = 2.5 → 3
        assert_eq!(
            plan_target(5, 5, ResizeTarget::Scale(0.5)).unwrap(),
            (3, 3)
        );
    }

    #[test]
    fn collapsed_side_is_invalid_geometry() {
        // 1 * 1 / 1000 = 0.001 → 0
        let result = plan(1000, 1, &opts_width(1));
        assert!(matches!(
            result,
            Err(EnhanceError::InvalidGeometry {
                width: 1,
                height: 0
            })
        ));
    }

    #[test]
    fn tiny_scale_is_invalid_geometry() {
        let result = plan_target(100, 50, ResizeTarget::Scale(0.001));
        assert!(matches!(result, Err(EnhanceError::InvalidGeometry { .. })));
    }

    #[test]
    fn zero_width_target_is_invalid_geometry() {
        let result = plan_target(100, 50, ResizeTarget::Width(0));
        assert!(matches!(result, Err(EnhanceError::InvalidGeometry { .. })));
    }

    #[test]
    fn oversized_target_rejected() {
        let result = plan_target(100, 100, ResizeTarget::Scale(1000.0));
        assert!(matches!(
            result,
            Err(EnhanceError::InvalidGeometry {
                width: 100_000,
                height: 100_000
            })
        ));
    }

    #[test]
    fn oversized_area_rejected() {
        // 30_000 per side fits MAX_DIMENSION but not MAX_PIXELS.
        let opts = EnhancementOptions {
            scale: 300.0,
            ..Default::default()
        };
        assert!(matches!(
            plan(100, 100, &opts),
            Err(EnhanceError::InvalidGeometry {
                width: 30_000,
                height: 30_000
            })
        ));
    }

    #[test]
    fn area_at_limit_accepted() {
        assert_eq!(
            plan_target(100, 100, ResizeTarget::Scale(100.0)).unwrap(),
            (10_000, 10_000)
        );
    }

    #[test]
    fn empty_source_rejected() {
        assert!(plan_target(0, 10, ResizeTarget::Scale(2.0)).is_err());
    }
}
