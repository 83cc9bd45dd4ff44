//! Display extent and initial corner placement.
//!
//! The viewport is derived from the container width and the image aspect
//! ratio. Whenever either changes, or a new initial rectangle is supplied, the
//! initial corner bases are derived again from scratch.
//!
//! Known limitation: without an explicit rectangle the default corners sit a
//! fixed [`DEFAULT_INSET`] from each edge. They do not adapt to the aspect
//! ratio and will cross on views narrower or shorter than twice the inset.

use crate::corner::{Corner, Quad};
use crate::error::ConfigError;
use crate::geometry::{image_to_view, ImageDescriptor, Point, ViewportDescriptor};

/// Distance of the default corners from the viewport edges, in view units.
pub const DEFAULT_INSET: f64 = 100.0;

/// Viewport geometry for one image at one container width.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportModel {
    image: ImageDescriptor,
    viewport: ViewportDescriptor,
    rectangle: Option<Quad<Point>>,
}

impl ViewportModel {
    /// Derive the viewport for `image` shown `container_width` units wide.
    ///
    /// `rectangle` is an optional initial quad in image space.
    pub fn new(
        image: ImageDescriptor,
        container_width: f64,
        rectangle: Option<Quad<Point>>,
    ) -> Result<Self, ConfigError> {
        let viewport = ViewportDescriptor::for_image(container_width, &image)?;
        Ok(Self {
            image,
            viewport,
            rectangle,
        })
    }

    pub fn image(&self) -> &ImageDescriptor {
        &self.image
    }

    pub fn viewport(&self) -> &ViewportDescriptor {
        &self.viewport
    }

    pub fn rectangle(&self) -> Option<&Quad<Point>> {
        self.rectangle.as_ref()
    }

    /// Re-derive for a new container width. Image dimensions are kept.
    pub fn with_container_width(&self, container_width: f64) -> Result<Self, ConfigError> {
        Self::new(self.image.clone(), container_width, self.rectangle)
    }

    /// Initial corner bases in view space.
    pub fn initial_corners(&self) -> Quad<Point> {
        match &self.rectangle {
            Some(rect) => rect.map(|_, p| image_to_view(*p, &self.image, &self.viewport)),
            None => {
                let right = self.viewport.container_width() - DEFAULT_INSET;
                let bottom = self.viewport.view_height() - DEFAULT_INSET;
                Quad::from_fn(|corner| match corner {
                    Corner::TopLeft => Point::new(DEFAULT_INSET, DEFAULT_INSET),
                    Corner::TopRight => Point::new(right, DEFAULT_INSET),
                    Corner::BottomLeft => Point::new(DEFAULT_INSET, bottom),
                    Corner::BottomRight => Point::new(right, bottom),
                })
            }
        }
    }
}
