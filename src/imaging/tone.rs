//! Global color corrections: gray-world white balance and saturation.

use super::color;
use super::metrics::channel_means;
use image::{Rgb, RgbImage};

/// Guards the per-channel gain against an all-black channel.
const MEAN_EPSILON: f64 = 1e-6;

/// Gray-world white balance.
///
/// Scales each channel so its mean moves to the average of the three channel
/// means, removing a uniform color cast. Results are rounded and clamped.
pub fn white_balance(img: &RgbImage) -> RgbImage {
    let means = channel_means(img);
    let gray = (means[0] + means[1] + means[2]) / 3.0;
    let gains = means.map(|m| (gray / (m + MEAN_EPSILON)) as f32);

    let mut out = img.clone();
    for p in out.pixels_mut() {
        *p = Rgb([
            color::to_u8(p[0] as f32 * gains[0]),
            color::to_u8(p[1] as f32 * gains[1]),
            color::to_u8(p[2] as f32 * gains[2]),
        ]);
    }
    out
}

/// Multiply HSV saturation by `factor`, clamped to the valid range.
pub fn adjust_saturation(img: &RgbImage, factor: f32) -> RgbImage {
    if factor == 1.0 {
        return img.clone();
    }
    let mut hsv = color::rgb_to_hsv(img);
    for c in &mut hsv {
        c.saturation = (c.saturation * factor).clamp(0.0, 1.0);
    }
    color::hsv_to_rgb(img.width(), img.height(), &hsv)
}
