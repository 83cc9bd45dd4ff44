//! A mounted crop session: viewport, four corners, their gesture controllers,
//! the derived overlay and the crop command, owned together.
//!
//! All mutation goes through `&mut self`, which is how the host event loop's
//! serialized dispatch shows up here. Corners are independent; the only shared
//! step is the overlay refresh after a corner changes.

use crate::config::{CropConfig, OverlayStyle};
use crate::corner::{Corner, CornerState, Quad};
use crate::crop::{CropCoordinates, CropCoordinator};
use crate::error::ConfigError;
use crate::geometry::{ImageDescriptor, Point, ViewportDescriptor};
use crate::gesture::{hit_test, GestureController, PointerEvent, PointerId};
use crate::overlay::OverlayPolygon;
use crate::viewport::ViewportModel;

#[derive(Debug)]
pub struct CropSession {
    model: ViewportModel,
    style: OverlayStyle,
    host_width: f64,
    corners: Quad<CornerState>,
    gestures: Quad<GestureController>,
    overlay: OverlayPolygon,
    coordinator: CropCoordinator,
}

impl CropSession {
    /// Mount a session.
    ///
    /// `host_width` is the display width used when the config has no
    /// `containerWidth`.
    pub fn new(
        config: &CropConfig,
        host_width: f64,
        coordinator: CropCoordinator,
    ) -> Result<Self, ConfigError> {
        let model = Self::derive_model(config, host_width)?;
        let corners = model.initial_corners().map(|_, p| CornerState::at(*p));
        let overlay = OverlayPolygon::from_corners(&corners);
        tracing::debug!(
            image = model.image().uri(),
            container_width = model.viewport().container_width(),
            view_height = model.viewport().view_height(),
            "crop session mounted"
        );
        Ok(Self {
            model,
            style: config.style.clone(),
            host_width,
            corners,
            gestures: Quad::default(),
            overlay,
            coordinator,
        })
    }

    fn derive_model(config: &CropConfig, host_width: f64) -> Result<ViewportModel, ConfigError> {
        let image = config.image()?;
        let rectangle = config.rectangle()?;
        ViewportModel::new(image, config.container_width_or(host_width), rectangle)
    }

    /// Apply a new host configuration.
    ///
    /// Corner state is replaced only when the image or the base geometry
    /// changes. A style-only change keeps corners and active drags. On error
    /// the session keeps its previous state.
    pub fn reconfigure(&mut self, config: &CropConfig) -> Result<(), ConfigError> {
        let model = Self::derive_model(config, self.host_width)?;
        self.style = config.style.clone();
        if model == self.model {
            tracing::debug!("crop session style updated");
            return Ok(());
        }
        self.install(model);
        Ok(())
    }

    /// Change the display width. Image and rectangle are kept; corners are
    /// reset unless the width is unchanged.
    ///
    /// The width also becomes the fallback for later configs that carry no
    /// `containerWidth`.
    pub fn set_container_width(&mut self, container_width: f64) -> Result<(), ConfigError> {
        let model = self.model.with_container_width(container_width)?;
        self.host_width = container_width;
        if model != self.model {
            self.install(model);
        }
        Ok(())
    }

    fn install(&mut self, model: ViewportModel) {
        let bases = model.initial_corners();
        for corner in Corner::WINDING {
            self.corners[corner].reset(bases[corner]);
            self.gestures[corner].reset();
        }
        self.model = model;
        self.overlay.refresh(&self.corners);
        tracing::debug!(
            image = self.model.image().uri(),
            container_width = self.model.viewport().container_width(),
            view_height = self.model.viewport().view_height(),
            "crop session reset"
        );
    }

    pub fn image(&self) -> &ImageDescriptor {
        self.model.image()
    }

    pub fn viewport(&self) -> &ViewportDescriptor {
        self.model.viewport()
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    pub fn corner(&self, corner: Corner) -> &CornerState {
        &self.corners[corner]
    }

    pub fn corners(&self) -> &Quad<CornerState> {
        &self.corners
    }

    pub fn overlay(&self) -> &OverlayPolygon {
        &self.overlay
    }

    /// The corner currently followed by `pointer`.
    pub fn corner_for_pointer(&self, pointer: PointerId) -> Option<Corner> {
        Corner::WINDING
            .into_iter()
            .find(|&corner| self.gestures[corner].pointer() == Some(pointer))
    }

    /// Touch-down at a view position. Claims the nearest free corner handle.
    ///
    /// Returns the corner that started dragging, or `None` if the touch missed
    /// every handle.
    pub fn pointer_down(&mut self, pointer: PointerId, position: Point) -> Option<Corner> {
        if let Some(corner) = self.corner_for_pointer(pointer) {
            tracing::debug!(pointer, %corner, "pointer already holds a corner");
            return None;
        }
        let corner = hit_test(&self.corners, position)?;
        self.grab(corner, pointer, position).then_some(corner)
    }

    /// Touch-down on a specific corner's handle, bypassing hit testing.
    pub fn grab(&mut self, corner: Corner, pointer: PointerId, position: Point) -> bool {
        let changed = self.gestures[corner].down(&mut self.corners[corner], pointer, position);
        if changed {
            self.overlay.refresh(&self.corners);
        }
        changed
    }

    pub fn pointer_move(&mut self, pointer: PointerId, position: Point) -> bool {
        self.route(pointer, |gesture, state| gesture.track(state, pointer, position))
    }

    pub fn pointer_up(&mut self, pointer: PointerId) -> bool {
        self.route(pointer, |gesture, state| gesture.up(state, pointer))
    }

    pub fn pointer_cancel(&mut self, pointer: PointerId) -> bool {
        self.route(pointer, |gesture, state| gesture.cancel(state, pointer))
    }

    /// Dispatch a host input event. Returns whether the overlay changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { pointer, position } => {
                self.pointer_down(pointer, position).is_some()
            }
            PointerEvent::Move { pointer, position } => self.pointer_move(pointer, position),
            PointerEvent::Up { pointer } => self.pointer_up(pointer),
            PointerEvent::Cancel { pointer } => self.pointer_cancel(pointer),
        }
    }

    fn route(
        &mut self,
        pointer: PointerId,
        f: impl FnOnce(&mut GestureController, &mut CornerState) -> bool,
    ) -> bool {
        let Some(corner) = self.corner_for_pointer(pointer) else {
            tracing::debug!(pointer, "ignoring event from a pointer that holds no corner");
            return false;
        };
        let changed = f(&mut self.gestures[corner], &mut self.corners[corner]);
        if changed {
            self.overlay.refresh(&self.corners);
        }
        changed
    }

    /// Crop to the current quad. The outcome arrives through the update sink.
    pub fn crop(&self) -> CropCoordinates {
        self.coordinator
            .request(&self.corners, self.model.image(), self.model.viewport())
    }
}
