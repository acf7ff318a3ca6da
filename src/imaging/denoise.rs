//! Edge-preserving noise reduction.
//!
//! A bilateral filter runs on the luma plane and on both chroma planes of a
//! BT.601 YCbCr decomposition, each with its own strength. A neighbor's
//! weight is the product of a spatial Gaussian and a range Gaussian on its
//! difference from the center sample, so pixels across a strong edge barely
//! contribute and the edge survives. Strength `0` leaves a plane untouched;
//! both at `0` return the input unchanged without a color round trip.

use super::color::{self, to_u8};
use image::{GrayImage, Luma, RgbImage};
use imageproc::filter::bilateral_filter;

/// 7×7 neighborhood.
const WINDOW: u32 = 7;
const SPATIAL_SIGMA: f32 = 1.5;
/// Range sigma (0–255 scale) per unit of strength.
const RANGE_SIGMA_PER_STEP: f32 = 2.5;

pub fn denoise(img: &RgbImage, luma_strength: u8, color_strength: u8) -> RgbImage {
    if (luma_strength == 0 && color_strength == 0) || img.width() == 0 || img.height() == 0 {
        return img.clone();
    }

    let mut planes = color::rgb_to_ycbcr(img);
    let (w, h) = (planes.width, planes.height);

    if luma_strength > 0 {
        planes.y = bilateral(&planes.y, w, h, range_sigma(luma_strength));
    }
    if color_strength > 0 {
        let sigma = range_sigma(color_strength);
        planes.cb = bilateral(&planes.cb, w, h, sigma);
        planes.cr = bilateral(&planes.cr, w, h, sigma);
    }

    color::ycbcr_to_rgb(&planes)
}

fn range_sigma(strength: u8) -> f32 {
    strength as f32 * RANGE_SIGMA_PER_STEP
}

/// Filter one plane at 8-bit precision; `plane` must hold `width × height` samples.
fn bilateral(plane: &[f32], width: u32, height: u32, range_sigma: f32) -> Vec<f32> {
    let gray = GrayImage::from_fn(width, height, |x, y| {
        Luma([to_u8(plane[(y * width + x) as usize])])
    });
    bilateral_filter(&gray, WINDOW, range_sigma, SPATIAL_SIGMA)
        .into_raw()
        .into_iter()
        .map(f32::from)
        .collect()
}
