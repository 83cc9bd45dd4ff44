//! Error types shared across the crop overlay.

use thiserror::Error;

use crate::corner::Corner;

/// Configuration errors.
///
/// These are fatal: a session is never built from a config that fails
/// validation, and a rejected reconfiguration leaves the previous state intact.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Image width or height is zero, negative or not finite.
    #[error("Invalid image dimensions: width ({width}) and height ({height}) must be positive")]
    InvalidImageDimensions { width: f64, height: f64 },

    /// Display width is zero, negative or not finite.
    #[error("Invalid container width: {0} (must be positive)")]
    InvalidContainerWidth(f64),

    /// No image URI was supplied.
    #[error("Missing initial image")]
    MissingImage,

    /// A supplied rectangle coordinate is not finite.
    #[error("Invalid {corner} coordinate: ({x}, {y})")]
    InvalidCoordinate { corner: Corner, x: f64, y: f64 },
}

/// Errors delivered to the host through the image update channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CropError {
    /// The external cropper reported a failure. The message is passed through untouched.
    #[error("Crop collaborator failed: {0}")]
    Collaborator(String),
}
