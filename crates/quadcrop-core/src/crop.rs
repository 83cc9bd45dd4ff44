//! Crop requests: mapping the dragged quad back to image space and handing it
//! to the external cropper.
//!
//! The cropper is asynchronous. It receives a one-shot completion and may
//! invoke it at any later point, after [`CropCoordinator::request`] has
//! returned. Success and failure both reach the host through the same update
//! sink; failures are passed through verbatim and never retried here.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::corner::{Corner, CornerState, Quad};
use crate::error::CropError;
use crate::geometry::{view_to_image, ImageDescriptor, Point, ViewportDescriptor};

/// The crop region in image pixel space, as sent to the cropper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropCoordinates {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
    /// Source image width.
    pub width: f64,
    /// Source image height.
    pub height: f64,
}

impl CropCoordinates {
    /// Map the displayed corner positions (`base + offset`) into image space.
    ///
    /// Works mid-drag: whatever offset is present at call time is used.
    pub fn from_corners(
        corners: &Quad<CornerState>,
        image: &ImageDescriptor,
        view: &ViewportDescriptor,
    ) -> Self {
        let mapped = corners.map(|_, state| view_to_image(state.position(), image, view));
        Self {
            top_left: mapped.top_left,
            top_right: mapped.top_right,
            bottom_left: mapped.bottom_left,
            bottom_right: mapped.bottom_right,
            width: image.width(),
            height: image.height(),
        }
    }

    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomLeft => self.bottom_left,
            Corner::BottomRight => self.bottom_right,
        }
    }

    /// Axis-aligned bounds of the quad as `(min, max)`.
    pub fn bounds(&self) -> (Point, Point) {
        Corner::WINDING.into_iter().map(|c| self.corner(c)).fold(
            (
                Point::new(f64::INFINITY, f64::INFINITY),
                Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            ),
            |(min, max), p| {
                (
                    Point::new(min.x.min(p.x), min.y.min(p.y)),
                    Point::new(max.x.max(p.x), max.y.max(p.y)),
                )
            },
        )
    }
}

/// What the cropper hands back on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CroppedImage {
    /// URI of the newly produced image.
    pub image: String,
}

/// Delivered to the host after a successful crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpdate {
    pub image_uri: String,
    pub coordinates: CropCoordinates,
}

/// One-shot completion handed to the cropper.
pub type CropCompletion = Box<dyn FnOnce(Result<CroppedImage, CropError>)>;

/// Host callback receiving every crop outcome.
pub type UpdateSink = Rc<dyn Fn(Result<ImageUpdate, CropError>)>;

/// The external service performing the actual pixel crop.
///
/// Implementations must call `done` exactly once, now or later.
pub trait CropCollaborator {
    fn crop_image(&self, coordinates: &CropCoordinates, image_uri: &str, done: CropCompletion);
}

impl<C: CropCollaborator + ?Sized> CropCollaborator for Rc<C> {
    fn crop_image(&self, coordinates: &CropCoordinates, image_uri: &str, done: CropCompletion) {
        (**self).crop_image(coordinates, image_uri, done)
    }
}

/// Owns the cropper and the host update sink.
pub struct CropCoordinator {
    collaborator: Box<dyn CropCollaborator>,
    on_update: UpdateSink,
}

impl fmt::Debug for CropCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropCoordinator").finish_non_exhaustive()
    }
}

impl CropCoordinator {
    pub fn new(
        collaborator: impl CropCollaborator + 'static,
        on_update: impl Fn(Result<ImageUpdate, CropError>) + 'static,
    ) -> Self {
        Self {
            collaborator: Box::new(collaborator),
            on_update: Rc::new(on_update),
        }
    }

    /// Map the corners to image space and dispatch the crop.
    ///
    /// Returns the coordinates that were sent.
    pub fn request(
        &self,
        corners: &Quad<CornerState>,
        image: &ImageDescriptor,
        view: &ViewportDescriptor,
    ) -> CropCoordinates {
        let coordinates = CropCoordinates::from_corners(corners, image, view);
        tracing::info!(
            image = image.uri(),
            width = coordinates.width,
            height = coordinates.height,
            "requesting crop"
        );

        let on_update = Rc::clone(&self.on_update);
        let done: CropCompletion = Box::new(move |result| match result {
            Ok(cropped) => {
                tracing::info!(image = %cropped.image, "crop completed");
                on_update(Ok(ImageUpdate {
                    image_uri: cropped.image,
                    coordinates,
                }));
            }
            Err(err) => {
                tracing::warn!(error = %err, "crop failed");
                on_update(Err(err));
            }
        });
        self.collaborator.crop_image(&coordinates, image.uri(), done);
        coordinates
    }
}
