//! High-quality resampling to the planned output size.
//!
//! Uses `image::imageops::resize` with the Lanczos3 kernel (a 3-lobe windowed
//! sinc, 6 taps per axis) for both enlargement and reduction. The `image`
//! crate clamps the filtered result into the 8-bit range.

use image::RgbImage;
use image::imageops::{self, FilterType};

pub const FILTER: FilterType = FilterType::Lanczos3;

pub fn resize(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    imageops::resize(img, width, height, FILTER)
}
