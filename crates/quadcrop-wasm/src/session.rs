//! The `CropSession` class exposed to JavaScript.
//!
//! Wraps one core [`quadcrop_core::CropSession`]. The host forwards pointer
//! events in view coordinates, reads `overlayPoints` for the SVG polygon after
//! each event that returns `true`, and calls `crop()` when the user confirms.

use js_sys::Function;
use quadcrop_core::{ConfigError, Corner, CropConfig, CropCoordinator, Point};
use wasm_bindgen::prelude::*;

use crate::collaborator::{forward_update, JsCropper};

/// Crop overlay session for JavaScript.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const session = new CropSession(
///   { width: 3024, height: 4032, initialImage: uri },
///   window.innerWidth,
///   (coords, uri, cb) => NativeCropper.crop(coords, uri, cb),
///   (newUri, coords, err) => err ? showError(err) : setImage(newUri),
/// );
///
/// el.onpointerdown = (e) => session.pointerDown(e.pointerId, e.offsetX, e.offsetY);
/// el.onpointermove = (e) => {
///   if (session.pointerMove(e.pointerId, e.offsetX, e.offsetY)) {
///     polygon.setAttribute("points", session.overlayPoints);
///   }
/// };
/// ```
#[wasm_bindgen(js_name = CropSession)]
pub struct JsCropSession {
    inner: quadcrop_core::CropSession,
}

#[wasm_bindgen(js_class = CropSession)]
impl JsCropSession {
    /// Mount a session.
    ///
    /// # Arguments
    /// * `config` - `{ width, height, initialImage, containerWidth?, rectangleCoordinates?, ...style }`
    /// * `viewport_width` - display width used when `containerWidth` is absent
    /// * `crop_image` - `(coordinates, uri, callback(err, res)) => void`
    /// * `update_image` - `(uri, coordinates, error) => void`
    ///
    /// # Errors
    /// Throws when the config is malformed or has non-positive dimensions.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: JsValue,
        viewport_width: f64,
        crop_image: Function,
        update_image: Function,
    ) -> Result<JsCropSession, JsValue> {
        let config = parse_config(config)?;
        let coordinator = CropCoordinator::new(JsCropper::new(crop_image), move |result| {
            forward_update(&update_image, result)
        });
        let inner = quadcrop_core::CropSession::new(&config, viewport_width, coordinator)
            .map_err(config_error)?;
        Ok(Self { inner })
    }

    /// Replace the configuration. Corners reset only when the image or
    /// geometry changes; style-only updates keep them.
    pub fn reconfigure(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config = parse_config(config)?;
        self.inner.reconfigure(&config).map_err(config_error)
    }

    /// Change the display width. Resets all corners unless the width is unchanged.
    #[wasm_bindgen(js_name = setContainerWidth)]
    pub fn set_container_width(&mut self, width: f64) -> Result<(), JsValue> {
        self.inner.set_container_width(width).map_err(config_error)
    }

    /// Touch-down. Returns the claimed corner name, or `undefined` on a miss.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, pointer: u32, x: f64, y: f64) -> Option<String> {
        self.inner
            .pointer_down(pointer, Point::new(x, y))
            .map(|corner| corner.as_str().to_string())
    }

    /// Touch-down on a specific corner (0-3 in winding order), skipping hit testing.
    pub fn grab(&mut self, corner: u8, pointer: u32, x: f64, y: f64) -> Result<bool, JsValue> {
        let corner = corner_from_u8(corner)
            .ok_or_else(|| JsValue::from_str(&format!("Invalid corner index: {}", corner)))?;
        Ok(self.inner.grab(corner, pointer, Point::new(x, y)))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, pointer: u32, x: f64, y: f64) -> bool {
        self.inner.pointer_move(pointer, Point::new(x, y))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, pointer: u32) -> bool {
        self.inner.pointer_up(pointer)
    }

    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self, pointer: u32) -> bool {
        self.inner.pointer_cancel(pointer)
    }

    /// Crop to the current quad. The result arrives through `updateImage`.
    pub fn crop(&self) {
        self.inner.crop();
    }

    /// Polygon `points` attribute: `"x,y x,y x,y x,y"`.
    #[wasm_bindgen(getter, js_name = overlayPoints)]
    pub fn overlay_points(&self) -> String {
        self.inner.overlay().points().to_string()
    }

    #[wasm_bindgen(getter, js_name = overlayRevision)]
    pub fn overlay_revision(&self) -> f64 {
        self.inner.overlay().revision() as f64
    }

    #[wasm_bindgen(getter, js_name = containerWidth)]
    pub fn container_width(&self) -> f64 {
        self.inner.viewport().container_width()
    }

    #[wasm_bindgen(getter, js_name = viewHeight)]
    pub fn view_height(&self) -> f64 {
        self.inner.viewport().view_height()
    }

    /// Displayed `[x, y]` of a corner (0-3 in winding order).
    #[wasm_bindgen(js_name = cornerPosition)]
    pub fn corner_position(&self, corner: u8) -> Result<Vec<f64>, JsValue> {
        let corner = corner_from_u8(corner)
            .ok_or_else(|| JsValue::from_str(&format!("Invalid corner index: {}", corner)))?;
        let p = self.inner.corner(corner).position();
        Ok(vec![p.x, p.y])
    }

    /// Overlay and handle colors as a plain object.
    #[wasm_bindgen(getter)]
    pub fn style(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.style()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn parse_config(config: JsValue) -> Result<CropConfig, JsValue> {
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop config: {}", e)))
}

fn config_error(err: ConfigError) -> JsValue {
    let message = JsValue::from_str(&err.to_string());
    web_sys::console::error_1(&message);
    message
}

/// Map a winding-order index to a corner.
///
/// - 0 = topLeft
/// - 1 = topRight
/// - 2 = bottomRight
/// - 3 = bottomLeft
pub(crate) fn corner_from_u8(value: u8) -> Option<Corner> {
    Corner::WINDING.get(value as usize).copied()
}
