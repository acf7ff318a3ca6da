//! Shared test utilities for the image-enhancer test suite.
//!
//! Provides deterministic synthetic images and small comparison helpers so
//! stage tests do not depend on fixture files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let img = noisy_image(64, 64, 20);
//! let out = denoise(&img, 5, 5);
//! assert!(max_abs_diff(&img, &out) > 0);
//! ```

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};

// =========================================================================
// Synthetic images
// =========================================================================

/// Horizontal gray ramp from 0 at the left edge to 255 at the right edge.
pub fn gradient_image(width: u32, height: u32) -> RgbImage {
    let span = width.saturating_sub(1).max(1);
    RgbImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / span) as u8;
        Rgb([v, v, v])
    })
}

/// Mid-gray field with independent per-channel noise in `±amplitude`.
///
/// Uses a fixed-seed LCG so every call yields the same pixels.
pub fn noisy_image(width: u32, height: u32, amplitude: u8) -> RgbImage {
    let mut state: u32 = 0x2545_f491;
    let mut next = move || {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (state >> 16) as i32
    };
    let span = 2 * amplitude as i32 + 1;
    RgbImage::from_fn(width, height, |_, _| {
        let mut channel = || (128 + next() % span - amplitude as i32).clamp(0, 255) as u8;
        Rgb([channel(), channel(), channel()])
    })
}

/// Hard vertical edge: `left` gray for `x < width / 2`, `right` gray after.
pub fn step_edge_image(width: u32, height: u32, left: u8, right: u8) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        let v = if x < width / 2 { left } else { right };
        Rgb([v, v, v])
    })
}

/// Soft vertical edge: an 8 px linear ramp from `lo` to `hi` centered on
/// the middle column.
pub fn ramp_edge_image(width: u32, height: u32, lo: u8, hi: u8) -> RgbImage {
    const RAMP: i64 = 8;
    let start = width as i64 / 2 - RAMP / 2;
    RgbImage::from_fn(width, height, |x, _| {
        let t = (x as i64 - start).clamp(0, RAMP) as f32 / RAMP as f32;
        let v = (lo as f32 + (hi as f32 - lo as f32) * t).round() as u8;
        Rgb([v, v, v])
    })
}

// =========================================================================
// Comparisons and encoding
// =========================================================================

/// Largest per-sample difference between two same-sized images.
pub fn max_abs_diff(a: &RgbImage, b: &RgbImage) -> u8 {
    assert_eq!(a.dimensions(), b.dimensions(), "image sizes differ");
    a.as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(x, y)| x.abs_diff(*y))
        .max()
        .unwrap_or(0)
}

/// Encode an RGB buffer as PNG bytes.
pub fn encode_png(img: &RgbImage) -> Vec<u8> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgb8,
        )
        .unwrap();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_spans_full_range() {
        let img = gradient_image(256, 2);
        assert_eq!(img.get_pixel(0, 0)[0], 0);
        assert_eq!(img.get_pixel(255, 1)[0], 255);
    }

    #[test]
    fn noise_is_deterministic_and_bounded() {
        let a = noisy_image(16, 16, 10);
        assert_eq!(a, noisy_image(16, 16, 10));
        assert!(a.as_raw().iter().all(|&v| (118..=138).contains(&v)));
        assert!(a.as_raw().iter().any(|&v| v != 128));
    }

    #[test]
    fn ramp_edge_is_monotonic() {
        let img = ramp_edge_image(48, 1, 80, 170);
        let row: Vec<u8> = (0..48).map(|x| img.get_pixel(x, 0)[0]).collect();
        assert!(row.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(row[0], 80);
        assert_eq!(row[47], 170);
    }
}
