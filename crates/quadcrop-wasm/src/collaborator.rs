//! JS-backed crop collaborator and update sink.
//!
//! The cropper is any JS function shaped like a Node-style async API:
//!
//! ```typescript
//! cropImage(coordinates, imageUri, (err, res) => { /* res.image is the new URI */ })
//! ```
//!
//! The host update callback is invoked as `updateImage(uri, coordinates, error)`:
//! on success `error` is `undefined`; on failure `uri` and `coordinates` are
//! `null` and `error` carries the cropper's message.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use quadcrop_core::{
    CropCollaborator, CropCompletion, CropCoordinates, CropError, CroppedImage, ImageUpdate,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

/// Calls a JS `cropImage(coordinates, uri, callback)` function.
pub(crate) struct JsCropper {
    crop_image: Function,
}

impl JsCropper {
    pub(crate) fn new(crop_image: Function) -> Self {
        Self { crop_image }
    }
}

impl CropCollaborator for JsCropper {
    fn crop_image(&self, coordinates: &CropCoordinates, image_uri: &str, done: CropCompletion) {
        let coords = match serde_wasm_bindgen::to_value(coordinates) {
            Ok(value) => value,
            Err(e) => {
                done(Err(CropError::Collaborator(e.to_string())));
                return;
            }
        };

        // Shared so a synchronous throw can still complete exactly once
        let pending = Rc::new(RefCell::new(Some(done)));
        let for_callback = Rc::clone(&pending);
        let callback = Closure::once_into_js(move |err: JsValue, res: JsValue| {
            if let Some(done) = for_callback.borrow_mut().take() {
                done(parse_response(err, res));
            }
        });

        let thrown = self.crop_image.call3(
            &JsValue::NULL,
            &coords,
            &JsValue::from_str(image_uri),
            &callback,
        );
        if let Err(e) = thrown {
            if let Some(done) = pending.borrow_mut().take() {
                done(Err(CropError::Collaborator(describe(&e))));
            }
        }
    }
}

fn parse_response(err: JsValue, res: JsValue) -> Result<CroppedImage, CropError> {
    if !err.is_null() && !err.is_undefined() {
        return Err(CropError::Collaborator(describe(&err)));
    }
    Reflect::get(&res, &JsValue::from_str("image"))
        .ok()
        .and_then(|image| image.as_string())
        .map(|image| CroppedImage { image })
        .ok_or_else(|| CropError::Collaborator("crop result has no image".to_string()))
}

/// Best-effort message for a JS error value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}

/// Forward a crop outcome to the host's `updateImage(uri, coordinates, error)`.
pub(crate) fn forward_update(update_image: &Function, result: Result<ImageUpdate, CropError>) {
    let call = match result {
        Ok(update) => match serde_wasm_bindgen::to_value(&update.coordinates) {
            Ok(coords) => update_image.call3(
                &JsValue::NULL,
                &JsValue::from_str(&update.image_uri),
                &coords,
                &JsValue::UNDEFINED,
            ),
            Err(e) => update_image.call3(
                &JsValue::NULL,
                &JsValue::NULL,
                &JsValue::NULL,
                &JsValue::from_str(&e.to_string()),
            ),
        },
        Err(err) => update_image.call3(
            &JsValue::NULL,
            &JsValue::NULL,
            &JsValue::NULL,
            &JsValue::from_str(&error_message(&err)),
        ),
    };
    if let Err(e) = call {
        web_sys::console::error_2(&JsValue::from_str("updateImage threw:"), &e);
    }
}

/// The message handed to JS, without the Rust-side prefix.
pub(crate) fn error_message(err: &CropError) -> String {
    match err {
        CropError::Collaborator(message) => message.clone(),
    }
}
