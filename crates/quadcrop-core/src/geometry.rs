//! Points, image/view descriptors and the mapping between the two spaces.
//!
//! # Coordinate Spaces
//!
//! - **Image space**: pixels of the source image, origin top-left,
//!   extent `width x height`
//! - **View space**: display units as rendered, origin top-left,
//!   extent `container_width x view_height`
//!
//! The mapping is an exact per-axis linear rescale. Nothing is clamped or
//! rounded. Descriptors can only be built through validating constructors,
//! so the divisions below never see a zero.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A 2D location. Which space it lives in is implied by where it is used.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// The source image: its URI and pixel dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    uri: String,
    width: f64,
    height: f64,
}

impl ImageDescriptor {
    /// Create a descriptor, rejecting empty URIs and non-positive dimensions.
    pub fn new(uri: impl Into<String>, width: f64, height: f64) -> Result<Self, ConfigError> {
        let uri = uri.into();
        if uri.is_empty() {
            return Err(ConfigError::MissingImage);
        }
        if !is_positive(width) || !is_positive(height) {
            return Err(ConfigError::InvalidImageDimensions { width, height });
        }
        Ok(Self { uri, width, height })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Height over width.
    pub fn aspect(&self) -> f64 {
        self.height / self.width
    }
}

/// Display extent of the image: the container width and the height derived
/// from it through the image aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportDescriptor {
    container_width: f64,
    view_height: f64,
}

impl ViewportDescriptor {
    /// Derive the viewport for `image` displayed `container_width` units wide.
    pub fn for_image(container_width: f64, image: &ImageDescriptor) -> Result<Self, ConfigError> {
        if !is_positive(container_width) {
            return Err(ConfigError::InvalidContainerWidth(container_width));
        }
        // Extreme aspect ratios can underflow or overflow even from valid inputs
        let view_height = container_width * image.aspect();
        if !is_positive(view_height) || !is_positive(container_width / image.width) {
            return Err(ConfigError::InvalidImageDimensions {
                width: image.width,
                height: image.height,
            });
        }
        Ok(Self {
            container_width,
            view_height,
        })
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    pub fn view_height(&self) -> f64 {
        self.view_height
    }
}

/// Map an image-space point into view space.
#[inline]
pub fn image_to_view(p: Point, image: &ImageDescriptor, view: &ViewportDescriptor) -> Point {
    Point::new(
        p.x * view.container_width / image.width,
        p.y * view.view_height / image.height,
    )
}

/// Map a view-space point into image space. Exact inverse of [`image_to_view`].
#[inline]
pub fn view_to_image(p: Point, image: &ImageDescriptor, view: &ViewportDescriptor) -> Point {
    Point::new(
        p.x * image.width / view.container_width,
        p.y * image.height / view.view_height,
    )
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn descriptors_strategy() -> impl Strategy<Value = (f64, f64, f64)> {
        (1.0f64..=10_000.0, 1.0f64..=10_000.0, 50.0f64..=4_000.0)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    proptest! {
        /// Property: view_to_image undoes image_to_view.
        #[test]
        fn prop_round_trip(
            (width, height, container) in descriptors_strategy(),
            x in -5_000.0f64..=15_000.0,
            y in -5_000.0f64..=15_000.0,
        ) {
            let image = ImageDescriptor::new("img", width, height).unwrap();
            let view = ViewportDescriptor::for_image(container, &image).unwrap();
            let p = Point::new(x, y);

            let back = view_to_image(image_to_view(p, &image, &view), &image, &view);

            prop_assert!(close(back.x, p.x), "x: {} != {}", back.x, p.x);
            prop_assert!(close(back.y, p.y), "y: {} != {}", back.y, p.y);
        }

        /// Property: view height always preserves the image aspect ratio.
        #[test]
        fn prop_view_preserves_aspect(
            (width, height, container) in descriptors_strategy(),
        ) {
            let image = ImageDescriptor::new("img", width, height).unwrap();
            let view = ViewportDescriptor::for_image(container, &image).unwrap();

            prop_assert!(close(view.view_height() / view.container_width(), height / width));
        }

        /// Property: image corners land on view corners.
        #[test]
        fn prop_extent_maps_to_extent(
            (width, height, container) in descriptors_strategy(),
        ) {
            let image = ImageDescriptor::new("img", width, height).unwrap();
            let view = ViewportDescriptor::for_image(container, &image).unwrap();

            let far = image_to_view(Point::new(width, height), &image, &view);
            prop_assert!(close(far.x, view.container_width()));
            prop_assert!(close(far.y, view.view_height()));
        }
    }
}
