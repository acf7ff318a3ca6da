//! Output encoding and packaging.
//!
//! The enhanced buffer is written in four formats:
//!
//! | Tag | MIME | Encoder | Setting |
//! |---|---|---|---|
//! | `png` | `image/png` | `image` PNG | best compression, adaptive filters |
//! | `jpg` | `image/jpeg` | `image` JPEG | quality 92 |
//! | `webp` | `image/webp` | `image` WebP | lossless (not lossy q90) |
//! | `apng` | `image/apng` | `png` crate | one frame, infinite loop, 100 ms delay |
//!
//! WebP is lossless rather than lossy at quality 90: the `image` WebP
//! encoder has no lossy mode. Files are larger than a q90 WebP but never
//! lose detail.
//!
//! The APNG is a compatibility output for clients that only accept animated
//! containers; it always holds exactly one frame.
//!
//! Formats are encoded independently. A failure in one is logged and that
//! tag is left out of the result; the request fails only when the buffer
//! itself is malformed or no requested format could be produced.

use crate::error::EnhanceError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

pub const JPEG_QUALITY: u8 = 92;
/// APNG frame delay in milliseconds.
pub const APNG_FRAME_DELAY_MS: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpg,
    Webp,
    Apng,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Png,
        OutputFormat::Jpg,
        OutputFormat::Webp,
        OutputFormat::Apng,
    ];

    /// Key used in the transport payload.
    pub fn tag(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Webp => "webp",
            OutputFormat::Apng => "apng",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
            OutputFormat::Apng => "image/apng",
        }
    }

    /// File extension, identical to the tag.
    pub fn extension(self) -> &'static str {
        self.tag()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpg),
            "webp" => Ok(OutputFormat::Webp),
            "apng" => Ok(OutputFormat::Apng),
            other => Err(format!(
                "unknown format '{other}' (expected png, jpg, webp or apng)"
            )),
        }
    }
}

/// One encoded image plus the format that describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlob {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

impl EncodedBlob {
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// `data:<mime>;base64,<body>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime(), STANDARD.encode(&self.bytes))
    }
}

/// All formats produced for one request, keyed by format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOutput {
    pub width: u32,
    pub height: u32,
    blobs: BTreeMap<OutputFormat, EncodedBlob>,
}

impl EncodedOutput {
    pub fn get(&self, format: OutputFormat) -> Option<&EncodedBlob> {
        self.blobs.get(&format)
    }

    pub fn contains(&self, format: OutputFormat) -> bool {
        self.blobs.contains_key(&format)
    }

    pub fn formats(&self) -> impl Iterator<Item = OutputFormat> + '_ {
        self.blobs.keys().copied()
    }

    pub fn blobs(&self) -> impl Iterator<Item = &EncodedBlob> {
        self.blobs.values()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Transport payload: `{"png": "data:image/png;base64,...", ...}`.
    /// Formats that failed to encode are absent.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .blobs
            .values()
            .map(|b| (b.format.tag().to_string(), b.to_data_url().into()))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Encode into all four formats.
pub fn encode(img: &RgbImage) -> Result<EncodedOutput, EnhanceError> {
    encode_formats(img, &OutputFormat::ALL)
}

/// Encode into the requested subset of formats.
pub fn encode_formats(
    img: &RgbImage,
    formats: &[OutputFormat],
) -> Result<EncodedOutput, EnhanceError> {
    check_buffer(img)?;

    let mut blobs = BTreeMap::new();
    for &format in formats {
        match encode_one(img, format) {
            Ok(bytes) => {
                debug!(%format, bytes = bytes.len(), "encoded output");
                blobs.insert(format, EncodedBlob { format, bytes });
            }
            Err(e) => warn!(%format, error = %e, "format skipped"),
        }
    }

    if blobs.is_empty() && !formats.is_empty() {
        return Err(EnhanceError::Encode(
            "no requested format could be encoded".into(),
        ));
    }
    Ok(EncodedOutput {
        width: img.width(),
        height: img.height(),
        blobs,
    })
}

fn check_buffer(img: &RgbImage) -> Result<(), EnhanceError> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(EnhanceError::Encode(format!("empty pixel buffer {w}x{h}")));
    }
    let expected = w as usize * h as usize * 3;
    if img.as_raw().len() != expected {
        return Err(EnhanceError::Encode(format!(
            "pixel buffer holds {} samples, expected {expected} for {w}x{h} RGB",
            img.as_raw().len()
        )));
    }
    Ok(())
}

fn encode_one(img: &RgbImage, format: OutputFormat) -> Result<Vec<u8>, EnhanceError> {
    let (w, h) = img.dimensions();
    let mut buf = Vec::new();
    let failed = |e: image::ImageError| EnhanceError::Encode(format!("{format}: {e}"));

    match format {
        OutputFormat::Png => {
            PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilter::Adaptive)
                .write_image(img.as_raw(), w, h, ExtendedColorType::Rgb8)
                .map_err(failed)?;
        }
        OutputFormat::Jpg => {
            JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
                .write_image(img.as_raw(), w, h, ExtendedColorType::Rgb8)
                .map_err(failed)?;
        }
        OutputFormat::Webp => {
            WebPEncoder::new_lossless(&mut buf)
                .write_image(img.as_raw(), w, h, ExtendedColorType::Rgb8)
                .map_err(failed)?;
        }
        OutputFormat::Apng => {
            write_apng(&mut buf, img)
                .map_err(|e| EnhanceError::Encode(format!("{format}: {e}")))?;
        }
    }
    Ok(buf)
}

/// Write `img` as a single-frame animated PNG (`acTL` + `fcTL` + `IDAT`).
///
/// The default image doubles as the only frame, so decoders without APNG
/// support still show the picture.
fn write_apng(buf: &mut Vec<u8>, img: &RgbImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(buf, img.width(), img.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_animated(1, 0)?;
    encoder.set_frame_delay(APNG_FRAME_DELAY_MS, 1000)?;
    let mut writer = encoder.write_header()?;
    writer.write_image_data(img.as_raw())?;
    writer.finish()
}
