//! Quadcrop WASM - WebAssembly bindings for Quadcrop
//!
//! This crate exposes the quadcrop-core crop overlay to JavaScript/TypeScript
//! hosts. The host renders the image, polygon and handles; this crate owns the
//! corner state and turns the final quad into image-space crop coordinates.
//!
//! # Module Structure
//!
//! - `session` - the `CropSession` JS class
//! - `collaborator` - adapters from JS callbacks to the core cropper contract
//!
//! # Usage
//!
//! ```typescript
//! import init, { CropSession } from '@quadcrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new CropSession(props, window.innerWidth, cropImage, updateImage);
//! polygon.setAttribute("points", session.overlayPoints);
//! ```

use wasm_bindgen::prelude::*;

mod collaborator;
mod session;

pub use session::JsCropSession;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
