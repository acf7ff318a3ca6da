//! Input decoding.
//!
//! Raw bytes of any raster format compiled into the `image` crate (JPEG, PNG,
//! TIFF, WebP, BMP, GIF) become a 3-channel 8-bit buffer:
//!
//! - the format is sniffed from magic bytes, never from a file name
//! - grayscale is expanded to RGB, 16-bit samples are reduced to 8-bit
//! - alpha is composited over neutral gray and then dropped
//!
//! Transparency is not carried through the pipeline and is not restored in
//! any output format. This is a known limitation of the pipeline, not a bug.

use crate::error::EnhanceError;
use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage};
use std::io::Cursor;
use tracing::debug;

/// Background that transparent pixels are flattened against.
pub const FLATTEN_BACKGROUND: [u8; 3] = [128, 128, 128];

/// Detect the raster format from the first bytes of `bytes`.
pub fn sniff_format(bytes: &[u8]) -> Result<ImageFormat, EnhanceError> {
    if bytes.is_empty() {
        return Err(EnhanceError::Decode("empty input".into()));
    }
    image::guess_format(bytes)
        .map_err(|e| EnhanceError::Decode(format!("unrecognized image format: {e}")))
}

pub fn decode(bytes: &[u8]) -> Result<RgbImage, EnhanceError> {
    let format = sniff_format(bytes)?;
    let img = ImageReader::with_format(Cursor::new(bytes), format)
        .decode()
        .map_err(|e| EnhanceError::Decode(format!("failed to decode {format:?}: {e}")))?;
    debug!(
        ?format,
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "decoded input"
    );
    if img.width() == 0 || img.height() == 0 {
        return Err(EnhanceError::Decode("image has no pixels".into()));
    }
    Ok(flatten(img))
}

/// Reduce any decoded image to opaque 8-bit RGB.
fn flatten(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }
    let rgba = img.into_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let alpha = src[3] as u32;
        let blend =
            |fg: u8, bg: u8| ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8;
        *dst = Rgb([
            blend(src[0], FLATTEN_BACKGROUND[0]),
            blend(src[1], FLATTEN_BACKGROUND[1]),
            blend(src[2], FLATTEN_BACKGROUND[2]),
        ]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{encode_png, gradient_image};
    use image::{GrayImage, Luma, Rgba, RgbaImage};

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn empty_input_is_decode_error() {
        let err = decode(&[]).unwrap_err();
        assert!(matches!(err, EnhanceError::Decode(ref m) if m == "empty input"));
    }

    #[test]
    fn garbage_is_decode_error() {
        let result = decode(b"definitely not an image");
        assert!(matches!(result, Err(EnhanceError::Decode(_))));
    }

    #[test]
    fn truncated_png_is_decode_error() {
        let bytes = encode_png(&gradient_image(32, 32));
        let result = decode(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(EnhanceError::Decode(_))));
    }

    #[test]
    fn rgb_png_round_trips() {
        let img = gradient_image(17, 9);
        let decoded = decode(&encode_png(&img)).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn sniffs_png_magic() {
        let bytes = encode_png(&gradient_image(4, 4));
        assert_eq!(sniff_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn grayscale_expands_to_three_channels() {
        let gray = GrayImage::from_pixel(5, 5, Luma([77]));
        let decoded = decode(&png_bytes(DynamicImage::ImageLuma8(gray))).unwrap();
        assert_eq!(decoded.get_pixel(2, 2).0, [77, 77, 77]);
    }

    #[test]
    fn transparent_pixels_flatten_to_background() {
        let mut rgba = RgbaImage::from_pixel(2, 1, Rgba([255, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        let decoded = decode(&png_bytes(DynamicImage::ImageRgba8(rgba))).unwrap();
        assert_eq!(decoded.get_pixel(0, 0).0, FLATTEN_BACKGROUND);
        assert_eq!(decoded.get_pixel(1, 0).0, [255, 0, 0]);
    }

    #[test]
    fn half_alpha_blends() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128]));
        let decoded = decode(&png_bytes(DynamicImage::ImageRgba8(rgba))).unwrap();
        let v = decoded.get_pixel(0, 0)[0];
        assert!((190..=193).contains(&v), "got {v}");
    }
}
