//! Image statistics.
//!
//! Used by white balance (channel means) and by tests that check
//! statistical properties of the pipeline rather than exact pixel values.

use image::RgbImage;

/// Mean of each channel over the whole image.
pub fn channel_means(img: &RgbImage) -> [f64; 3] {
    let mut sums = [0u64; 3];
    for p in img.pixels() {
        for c in 0..3 {
            sums[c] += p[c] as u64;
        }
    }
    let n = (img.width() as u64 * img.height() as u64).max(1) as f64;
    sums.map(|s| s as f64 / n)
}

/// Mean over all samples of all channels.
pub fn mean_intensity(img: &RgbImage) -> f64 {
    let m = channel_means(img);
    (m[0] + m[1] + m[2]) / 3.0
}

pub fn channel_variance(img: &RgbImage, channel: usize) -> f64 {
    let n = (img.width() as u64 * img.height() as u64).max(1) as f64;
    let mean = channel_means(img)[channel];
    img.pixels()
        .map(|p| {
            let d = p[channel] as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// Variance of the 4-neighbor Laplacian of luma over interior pixels.
///
/// A standard sharpness measure: higher means stronger local edges.
pub fn laplacian_variance(img: &RgbImage) -> f64 {
    let (w, h) = img.dimensions();
    if w < 3 || h < 3 {
        return 0.0;
    }
    let luma = |x: u32, y: u32| {
        let p = img.get_pixel(x, y);
        0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64
    };

    let mut values = Vec::with_capacity(((w - 2) * (h - 2)) as usize);
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let lap = luma(x - 1, y) + luma(x + 1, y) + luma(x, y - 1) + luma(x, y + 1)
                - 4.0 * luma(x, y);
            values.push(lap);
        }
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}
