//! Color-space conversions used by the pipeline stages.
//!
//! Every conversion is a pure function that returns a new buffer; nothing
//! reinterprets channels in place. Planes are stored row-major as `f32` so
//! that a forward + inverse round trip does not lose precision to 8-bit
//! quantization between steps.
//!
//! | Space | Used by | Implementation |
//! |---|---|---|
//! | YCbCr (BT.601 full range) | denoise | hand-written matrix |
//! | CIE L\*a\*b\* (D65) | local contrast, contrast stretch | `palette` |
//! | HSV | saturation | `palette` |

use image::{Rgb, RgbImage};
use palette::{FromColor, Hsv, Lab, LinSrgb, Srgb};

/// Separated luma and chroma planes, each sample on the 0–255 scale
/// (chroma centered on 128).
#[derive(Debug, Clone, PartialEq)]
pub struct YCbCrPlanes {
    pub width: u32,
    pub height: u32,
    pub y: Vec<f32>,
    pub cb: Vec<f32>,
    pub cr: Vec<f32>,
}

/// CIE L\*a\*b\* planes. `l` is in `0.0..=100.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabPlanes {
    pub width: u32,
    pub height: u32,
    pub l: Vec<f32>,
    pub a: Vec<f32>,
    pub b: Vec<f32>,
}

/// Round and clamp a 0–255 scale value into a sample.
#[inline]
pub fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[inline]
fn unit_to_u8(v: f32) -> u8 {
    to_u8(v * 255.0)
}

#[inline]
fn srgb_of(p: &Rgb<u8>) -> Srgb<f32> {
    Srgb::new(
        p[0] as f32 / 255.0,
        p[1] as f32 / 255.0,
        p[2] as f32 / 255.0,
    )
}

#[inline]
fn rgb_of(c: Srgb<f32>) -> Rgb<u8> {
    Rgb([unit_to_u8(c.red), unit_to_u8(c.green), unit_to_u8(c.blue)])
}

pub fn rgb_to_ycbcr(img: &RgbImage) -> YCbCrPlanes {
    let n = (img.width() * img.height()) as usize;
    let mut y = Vec::with_capacity(n);
    let mut cb = Vec::with_capacity(n);
    let mut cr = Vec::with_capacity(n);
    for p in img.pixels() {
        let (r, g, b) = (p[0] as f32, p[1] as f32, p[2] as f32);
        y.push(0.299 * r + 0.587 * g + 0.114 * b);
        cb.push(128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b);
        cr.push(128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b);
    }
    YCbCrPlanes {
        width: img.width(),
        height: img.height(),
        y,
        cb,
        cr,
    }
}

pub fn ycbcr_to_rgb(planes: &YCbCrPlanes) -> RgbImage {
    RgbImage::from_fn(planes.width, planes.height, |x, row| {
        let i = (row * planes.width + x) as usize;
        let y = planes.y[i];
        let cb = planes.cb[i] - 128.0;
        let cr = planes.cr[i] - 128.0;
        Rgb([
            to_u8(y + 1.402 * cr),
            to_u8(y - 0.344_136 * cb - 0.714_136 * cr),
            to_u8(y + 1.772 * cb),
        ])
    })
}

pub fn rgb_to_lab(img: &RgbImage) -> LabPlanes {
    let n = (img.width() * img.height()) as usize;
    let mut l = Vec::with_capacity(n);
    let mut a = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);
    for p in img.pixels() {
        let linear: LinSrgb<f32> = srgb_of(p).into_linear();
        let lab: Lab = Lab::from_color(linear);
        l.push(lab.l);
        a.push(lab.a);
        b.push(lab.b);
    }
    LabPlanes {
        width: img.width(),
        height: img.height(),
        l,
        a,
        b,
    }
}

pub fn lab_to_rgb(planes: &LabPlanes) -> RgbImage {
    RgbImage::from_fn(planes.width, planes.height, |x, row| {
        let i = (row * planes.width + x) as usize;
        let lab: Lab = Lab::new(planes.l[i], planes.a[i], planes.b[i]);
        let linear: LinSrgb<f32> = LinSrgb::from_color(lab);
        let srgb: Srgb<f32> = Srgb::from_linear(linear);
        rgb_of(srgb)
    })
}

/// Per-pixel HSV values; hue in degrees, saturation and value in `0.0..=1.0`.
pub fn rgb_to_hsv(img: &RgbImage) -> Vec<Hsv> {
    img.pixels().map(|p| Hsv::from_color(srgb_of(p))).collect()
}

pub fn hsv_to_rgb(width: u32, height: u32, hsv: &[Hsv]) -> RgbImage {
    RgbImage::from_fn(width, height, |x, row| {
        let i = (row * width + x) as usize;
        rgb_of(Srgb::from_color(hsv[i]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_image, max_abs_diff, noisy_image};

    #[test]
    fn ycbcr_round_trip_is_near_lossless() {
        let img = noisy_image(32, 24, 40);
        let back = ycbcr_to_rgb(&rgb_to_ycbcr(&img));
        assert!(max_abs_diff(&img, &back) <= 1);
    }

    #[test]
    fn ycbcr_gray_has_neutral_chroma() {
        let img = RgbImage::from_pixel(4, 4, Rgb([128, 128, 128]));
        let planes = rgb_to_ycbcr(&img);
        assert!(planes.y.iter().all(|&y| (y - 128.0).abs() < 1e-3));
        assert!(planes.cb.iter().all(|&c| (c - 128.0).abs() < 1e-3));
        assert!(planes.cr.iter().all(|&c| (c - 128.0).abs() < 1e-3));
    }

    #[test]
    fn lab_round_trip_is_near_lossless() {
        let img = gradient_image(64, 16);
        let back = lab_to_rgb(&rgb_to_lab(&img));
        assert!(max_abs_diff(&img, &back) <= 1);
    }

    #[test]
    fn lab_lightness_spans_black_to_white() {
        let mut img = RgbImage::from_pixel(2, 1, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 255, 255]));
        let lab = rgb_to_lab(&img);
        assert!(lab.l[0].abs() < 0.01);
        assert!((lab.l[1] - 100.0).abs() < 0.1);
    }

    #[test]
    fn hsv_round_trip_is_near_lossless() {
        let img = noisy_image(16, 16, 90);
        let hsv = rgb_to_hsv(&img);
        let back = hsv_to_rgb(16, 16, &hsv);
        assert!(max_abs_diff(&img, &back) <= 1);
    }

    #[test]
    fn hsv_gray_has_zero_saturation() {
        let img = RgbImage::from_pixel(3, 3, Rgb([200, 200, 200]));
        assert!(rgb_to_hsv(&img).iter().all(|c| c.saturation == 0.0));
    }

    #[test]
    fn to_u8_clamps_instead_of_wrapping() {
        assert_eq!(to_u8(-12.0), 0);
        assert_eq!(to_u8(300.0), 255);
        assert_eq!(to_u8(127.5), 128);
    }
}
