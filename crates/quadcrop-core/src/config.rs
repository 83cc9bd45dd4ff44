//! Host-supplied configuration for a crop session.
//!
//! Field names deserialize from camelCase so a JS props object or a JSON
//! document can be passed through unchanged.

use serde::{Deserialize, Serialize};

use crate::corner::{Corner, Quad};
use crate::error::ConfigError;
use crate::geometry::{ImageDescriptor, Point};

/// Overlay and handle appearance. Carried for renderers only; no effect on geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayStyle {
    pub overlay_color: String,
    pub overlay_opacity: f64,
    pub overlay_stroke_color: String,
    pub overlay_stroke_width: f64,
    pub handler_color: String,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            overlay_color: "blue".to_string(),
            overlay_opacity: 0.5,
            overlay_stroke_color: "blue".to_string(),
            overlay_stroke_width: 3.0,
            handler_color: "blue".to_string(),
        }
    }
}

/// Everything the host provides to mount a crop session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropConfig {
    /// Image width in pixels.
    pub width: f64,
    /// Image height in pixels.
    pub height: f64,
    /// Display width. Falls back to the host viewport width when absent.
    #[serde(default)]
    pub container_width: Option<f64>,
    /// URI of the image being cropped.
    #[serde(default)]
    pub initial_image: String,
    /// Initial quad in image space. Absent means fixed-inset defaults.
    #[serde(default)]
    pub rectangle_coordinates: Option<Quad<Point>>,
    #[serde(flatten)]
    pub style: OverlayStyle,
}

impl CropConfig {
    pub fn new(initial_image: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            container_width: None,
            initial_image: initial_image.into(),
            rectangle_coordinates: None,
            style: OverlayStyle::default(),
        }
    }

    pub fn with_container_width(mut self, container_width: f64) -> Self {
        self.container_width = Some(container_width);
        self
    }

    pub fn with_rectangle(mut self, rectangle: Quad<Point>) -> Self {
        self.rectangle_coordinates = Some(rectangle);
        self
    }

    /// Validate the image part of the config.
    pub fn image(&self) -> Result<ImageDescriptor, ConfigError> {
        ImageDescriptor::new(self.initial_image.clone(), self.width, self.height)
    }

    /// The configured container width, or `fallback` when none was given.
    pub fn container_width_or(&self, fallback: f64) -> f64 {
        self.container_width.unwrap_or(fallback)
    }

    /// Validate the supplied rectangle, if any.
    pub fn rectangle(&self) -> Result<Option<Quad<Point>>, ConfigError> {
        let Some(rect) = self.rectangle_coordinates else {
            return Ok(None);
        };
        for corner in Corner::WINDING {
            let p = rect[corner];
            if !p.is_finite() {
                return Err(ConfigError::InvalidCoordinate {
                    corner,
                    x: p.x,
                    y: p.y,
                });
            }
        }
        Ok(Some(rect))
    }
}
