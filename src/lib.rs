//! # Image Enhancer
//!
//! A photo enhancement pipeline: raw image bytes go in, an enhanced and
//! upscaled image comes out in PNG, JPEG, WebP, and single-frame APNG.
//!
//! # Architecture: Fixed Stage Pipeline
//!
//! One request runs through a fixed sequence of pure stages, each taking an
//! 8-bit RGB buffer and returning a new one:
//!
//! ```text
//! decode → plan size → denoise → white balance → local contrast (CLAHE)
//!        → contrast stretch → resize (Lanczos3) → unsharp mask → saturation → encode
//! ```
//!
//! The order is deliberate. Noise removal and color/contrast correction run
//! at the source resolution, where noise still has its original character
//! and the buffers are smallest. Sharpening and saturation run last so the
//! resampler does not magnify their halos.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Orchestrates the stages; [`enhance`] is the public entry point |
//! | [`imaging`] | Pure-Rust pixel operations: decode, color spaces, every enhancement stage |
//! | [`geometry`] | Output size planning from scale / width / height |
//! | [`encode`] | PNG, JPEG, WebP, APNG encoders and the keyed [`EncodedOutput`] |
//! | [`options`] | [`EnhancementOptions`] with range validation, batch thread settings |
//! | [`error`] | [`EnhanceError`] taxonomy |
//! | [`batch`] | File-level driver: parallel batch over input paths |
//! | [`naming`] | `{stem}_enhanced.{ext}` output file names |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Stateless Core
//!
//! [`enhance`] owns every buffer it creates and keeps nothing between calls.
//! Transport adapters (a CLI, an HTTP handler) can call it from any number
//! of threads without coordination. Parallelism lives in the caller; the
//! [`batch`] driver runs independent inputs on a rayon pool.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling, and encoding use the `image` crate; the bilateral
//! and Gaussian filters come from `imageproc`; APNG chunks are written with
//! the `png` crate; Lab and HSV conversions come from `palette`.
//! There is no OpenCV, ImageMagick, or other system library to install.
//!
//! ## Alpha Is Flattened
//!
//! Transparent inputs are composited over neutral gray at decode time and
//! the alpha channel is dropped. No output carries transparency.
//!
//! ## Memory
//!
//! Each stage allocates its output buffer and, for color-space stages,
//! `f32` working planes. Peak usage is roughly six to seven times one 8-bit
//! RGB buffer at the larger of the source and target sizes. Output sides are
//! capped at [`geometry::MAX_DIMENSION`] and the output area at
//! [`geometry::MAX_PIXELS`] (100 megapixels). At that size the sharpening
//! stage alone holds two `f32` copies, about 2.4 GB.

pub mod batch;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod imaging;
pub mod naming;
pub mod options;
pub mod output;
pub mod pipeline;

pub use encode::{EncodedBlob, EncodedOutput, OutputFormat};
pub use error::EnhanceError;
pub use options::{BatchConfig, EnhancementOptions};
pub use pipeline::{enhance, enhance_image, enhance_to_formats};

#[cfg(test)]
pub(crate) mod test_helpers;
