//! Error taxonomy for the enhancement core.
//!
//! Every failure the pipeline can raise is one variant of [`EnhanceError`].
//! The pipeline stops at the first error; there is no partial-success mode
//! across stages. Transport adapters use [`EnhanceError::is_client_error`] to
//! decide between a "bad input" response and an internal failure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnhanceError {
    /// Input bytes are empty, truncated, or not a recognized raster format.
    #[error("Decode error: {0}")]
    Decode(String),
    /// The planned output size has a side below 1 px or above the size cap.
    #[error("Invalid geometry: target {width}x{height} is out of range")]
    InvalidGeometry { width: i64, height: i64 },
    /// A numeric option is outside its documented range.
    #[error("Invalid option: {name} = {value} (expected {range})")]
    InvalidOption {
        name: &'static str,
        value: String,
        range: &'static str,
    },
    /// Pixel buffer could not be packaged into any output format.
    #[error("Encode error: {0}")]
    Encode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EnhanceError {
    /// `true` for failures caused by the caller's input (bytes or options),
    /// `false` for internal faults.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EnhanceError::Decode(_)
                | EnhanceError::InvalidGeometry { .. }
                | EnhanceError::InvalidOption { .. }
        )
    }

    pub(crate) fn option(name: &'static str, value: impl ToString, range: &'static str) -> Self {
        EnhanceError::InvalidOption {
            name,
            value: value.to_string(),
            range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_client_errors() {
        assert!(EnhanceError::Decode("empty input".into()).is_client_error());
        assert!(
            EnhanceError::InvalidGeometry {
                width: 0,
                height: 10
            }
            .is_client_error()
        );
        assert!(EnhanceError::option("scale", -1.0, "> 0").is_client_error());
    }

    #[test]
    fn encode_and_io_are_internal() {
        assert!(!EnhanceError::Encode("boom".into()).is_client_error());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!EnhanceError::from(io).is_client_error());
    }

    #[test]
    fn invalid_option_message_names_the_field() {
        let err = EnhanceError::option("clahe_clip", 9.0, "0.5..=5.0");
        assert_eq!(
            err.to_string(),
            "Invalid option: clahe_clip = 9 (expected 0.5..=5.0)"
        );
    }
}
