//! Quadcrop Core - corner-drag crop overlay
//!
//! This crate holds the state behind an interactive crop overlay: four
//! draggable corners over a displayed image, the polygon rendered between
//! them, and the mapping of that polygon back into image pixels for a crop.
//!
//! # Module Structure
//!
//! - `geometry` - points, image/view descriptors, image <-> view mapping
//! - `corner` - corner identities, `Quad<T>`, drag-aware `CornerState`
//! - `gesture` - per-corner pointer tracking and handle hit testing
//! - `overlay` - the derived polygon and its serialized points
//! - `viewport` - display extent and initial corner placement
//! - `crop` - crop coordinates and the external cropper contract
//! - `session` - one mounted crop session tying the above together
//! - `raster` - an in-memory cropper built on the `image` crate
//!
//! Rendering, styling and pixel work on native images belong to the host.

pub mod config;
pub mod corner;
pub mod crop;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod overlay;
pub mod raster;
pub mod session;
pub mod viewport;

pub use config::{CropConfig, OverlayStyle};
pub use corner::{Corner, CornerState, Quad};
pub use crop::{
    CropCollaborator, CropCompletion, CropCoordinates, CropCoordinator, CroppedImage, ImageUpdate,
    UpdateSink,
};
pub use error::{ConfigError, CropError};
pub use geometry::{image_to_view, view_to_image, ImageDescriptor, Point, ViewportDescriptor};
pub use gesture::{hit_test, GestureController, PointerEvent, PointerId, HANDLE_SIZE};
pub use overlay::OverlayPolygon;
pub use raster::{crop_to_bounds, MemoryCropper, RasterError, RasterImage};
pub use session::CropSession;
pub use viewport::{ViewportModel, DEFAULT_INSET};
