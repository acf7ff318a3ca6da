//! Pixel operations in pure Rust, with no system libraries.
//!
//! | Operation | Module | Crate / technique |
//! |---|---|---|
//! | **Decode** | [`decode`] | `image` decoders, magic-byte sniffing |
//! | **Color spaces** | [`color`] | BT.601 YCbCr by hand, Lab + HSV via `palette` |
//! | **Denoise** | [`denoise`] | `imageproc` bilateral filter on luma and chroma planes |
//! | **White balance / saturation** | [`tone`] | gray-world gains, HSV scaling |
//! | **Local + global contrast** | [`contrast`] | CLAHE and percentile stretch on Lab L |
//! | **Resize** | [`resample`] | `image::imageops::resize`, Lanczos3 |
//! | **Sharpen** | [`sharpen`] | unsharp mask over an `imageproc` `f32` Gaussian blur |
//! | **Statistics** | [`metrics`] | channel means, Laplacian variance |
//!
//! Every stage takes `&RgbImage` and returns a new `RgbImage`; none keeps
//! state between calls, so stages can be tested in isolation.

pub mod color;
pub mod contrast;
pub mod decode;
pub mod denoise;
pub mod metrics;
pub mod resample;
pub mod sharpen;
pub mod tone;

pub use contrast::{local_contrast, stretch_contrast};
pub use decode::decode;
pub use denoise::denoise;
pub use resample::resize;
pub use sharpen::unsharp_mask;
pub use tone::{adjust_saturation, white_balance};
