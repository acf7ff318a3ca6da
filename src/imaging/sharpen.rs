//! Unsharp mask.
//!
//! `out = src + amount × (src − gaussian(src, sigma))`, evaluated in `f32`
//! and clamped back to 8 bits. Larger sigma widens the halo; amount scales
//! its strength. The blurred copy stays in `f32`; only the final sum is
//! rounded.

use super::color::to_u8;
use image::{DynamicImage, RgbImage};
use imageproc::filter::gaussian_blur_f32;

pub fn unsharp_mask(img: &RgbImage, amount: f32, sigma: f32) -> RgbImage {
    if amount == 0.0 || sigma <= 0.0 || img.width() == 0 || img.height() == 0 {
        return img.clone();
    }
    let soft = gaussian_blur_f32(&DynamicImage::ImageRgb8(img.clone()).into_rgb32f(), sigma);

    let mut out = img.clone();
    for (dst, blurred) in out.iter_mut().zip(soft.iter()) {
        let v = *dst as f32;
        *dst = to_u8(v + amount * (v - blurred * 255.0));
    }
    out
}
