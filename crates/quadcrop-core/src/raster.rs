//! An in-process crop collaborator backed by the `image` crate.
//!
//! Encoded images are registered under a URI. A crop request decodes the
//! source, cuts out the axis-aligned bounds of the requested quad and stores
//! the PNG-encoded result under a fresh `memory://crop/N.png` URI.
//!
//! This is a bounds crop only. The quad is not perspective-corrected, and
//! corners outside the image are clamped at the pixel level.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader};
use thiserror::Error;

use crate::crop::{CropCollaborator, CropCompletion, CropCoordinates, CroppedImage};
use crate::error::CropError;

/// Errors raised while producing a crop in memory.
#[derive(Debug, Error)]
pub enum RasterError {
    /// No image is registered under this URI.
    #[error("Unknown image: {0}")]
    UnknownImage(String),

    /// The stored bytes could not be decoded.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The cropped pixels could not be encoded.
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// RGB pixel data (3 bytes per pixel, row-major).
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode any supported format (JPEG, PNG) into RGB.
    pub fn decode(bytes: &[u8]) -> Result<Self, RasterError> {
        let img = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| RasterError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| RasterError::Decode(e.to_string()))?
            .into_rgb8();
        let (width, height) = img.dimensions();
        Ok(Self::new(width, height, img.into_raw()))
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(&self.pixels, self.width, self.height, ExtendedColorType::Rgb8)
            .map_err(|e| RasterError::Encode(e.to_string()))?;
        Ok(buf)
    }
}

/// Cut out the bounding box of the quad.
///
/// `coordinates` are in the pixel space described by its own `width` and
/// `height`; they are rescaled when the decoded image has a different size.
/// The result is at least 1x1.
pub fn crop_to_bounds(image: &RasterImage, coordinates: &CropCoordinates) -> RasterImage {
    let (min, max) = coordinates.bounds();
    let sx = image.width as f64 / coordinates.width;
    let sy = image.height as f64 / coordinates.height;

    let clamp_x = |v: f64| ((v * sx).round().max(0.0) as u32).min(image.width);
    let clamp_y = |v: f64| ((v * sy).round().max(0.0) as u32).min(image.height);

    let left = clamp_x(min.x).min(image.width.saturating_sub(1));
    let top = clamp_y(min.y).min(image.height.saturating_sub(1));
    let right = clamp_x(max.x).max(left + 1).min(image.width);
    let bottom = clamp_y(max.y).max(top + 1).min(image.height);

    let out_width = right - left;
    let out_height = bottom - top;
    let mut pixels = Vec::with_capacity((out_width * out_height * 3) as usize);

    for y in top..bottom {
        let row = (y * image.width * 3) as usize;
        let start = row + (left * 3) as usize;
        let end = row + (right * 3) as usize;
        pixels.extend_from_slice(&image.pixels[start..end]);
    }

    RasterImage::new(out_width, out_height, pixels)
}

/// Crop collaborator over an in-memory URI → encoded-bytes store.
///
/// Completes synchronously, within the `crop_image` call.
#[derive(Debug, Default)]
pub struct MemoryCropper {
    store: RefCell<HashMap<String, Vec<u8>>>,
    next_id: Cell<u64>,
}

impl MemoryCropper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded image bytes under `uri`, replacing any previous entry.
    pub fn insert(&self, uri: impl Into<String>, bytes: Vec<u8>) {
        self.store.borrow_mut().insert(uri.into(), bytes);
    }

    /// Encoded bytes stored under `uri`.
    pub fn get(&self, uri: &str) -> Option<Vec<u8>> {
        self.store.borrow().get(uri).cloned()
    }

    fn crop(&self, coordinates: &CropCoordinates, image_uri: &str) -> Result<String, RasterError> {
        let bytes = self
            .get(image_uri)
            .ok_or_else(|| RasterError::UnknownImage(image_uri.to_string()))?;
        let source = RasterImage::decode(&bytes)?;
        let cropped = crop_to_bounds(&source, coordinates);
        let encoded = cropped.encode_png()?;

        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let uri = format!("memory://crop/{id}.png");
        tracing::debug!(
            source = image_uri,
            result = %uri,
            width = cropped.width,
            height = cropped.height,
            "cropped in memory"
        );
        self.insert(uri.clone(), encoded);
        Ok(uri)
    }
}

impl CropCollaborator for MemoryCropper {
    fn crop_image(&self, coordinates: &CropCoordinates, image_uri: &str, done: CropCompletion) {
        let result = self
            .crop(coordinates, image_uri)
            .map(|image| CroppedImage { image })
            .map_err(|e| CropError::Collaborator(e.to_string()));
        done(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use std::rc::Rc;

    /// Each pixel encodes its position so crops can be checked exactly.
    fn test_image(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(x as u8);
                pixels.push(y as u8);
                pixels.push(0);
            }
        }
        RasterImage::new(width, height, pixels)
    }

    fn rect(left: f64, top: f64, right: f64, bottom: f64, width: f64, height: f64) -> CropCoordinates {
        CropCoordinates {
            top_left: Point::new(left, top),
            top_right: Point::new(right, top),
            bottom_left: Point::new(left, bottom),
            bottom_right: Point::new(right, bottom),
            width,
            height,
        }
    }

    #[test]
    fn test_crop_to_bounds_exact() {
        let img = test_image(10, 10);
        let result = crop_to_bounds(&img, &rect(2.0, 3.0, 6.0, 8.0, 10.0, 10.0));
        assert_eq!(result.width, 4);
        assert_eq!(result.height, 5);
        // First pixel comes from (2, 3)
        assert_eq!(&result.pixels[0..3], &[2, 3, 0]);
    }

    #[test]
    fn test_crop_rescales_coordinates() {
        // Coordinates given for a 1000x1000 original, pixels are a 10x10 preview
        let img = test_image(10, 10);
        let result = crop_to_bounds(&img, &rect(500.0, 0.0, 1000.0, 500.0, 1000.0, 1000.0));
        assert_eq!((result.width, result.height), (5, 5));
        assert_eq!(&result.pixels[0..3], &[5, 0, 0]);
    }

    #[test]
    fn test_crop_skewed_quad_uses_bounds() {
        let img = test_image(20, 20);
        let coords = CropCoordinates {
            top_left: Point::new(4.0, 2.0),
            top_right: Point::new(15.0, 5.0),
            bottom_left: Point::new(2.0, 18.0),
            bottom_right: Point::new(12.0, 14.0),
            width: 20.0,
            height: 20.0,
        };
        let result = crop_to_bounds(&img, &coords);
        assert_eq!((result.width, result.height), (13, 16));
    }

    #[test]
    fn test_crop_clamps_outside_image() {
        let img = test_image(10, 10);
        let result = crop_to_bounds(&img, &rect(-5.0, -5.0, 50.0, 50.0, 10.0, 10.0));
        assert_eq!(result, img);
    }

    #[test]
    fn test_crop_degenerate_is_one_pixel() {
        let img = test_image(10, 10);
        let result = crop_to_bounds(&img, &rect(20.0, 20.0, 20.0, 20.0, 10.0, 10.0));
        assert_eq!((result.width, result.height), (1, 1));
        assert_eq!(&result.pixels[..], &[9, 9, 0]);
    }

    #[test]
    fn test_memory_cropper_round() {
        let cropper = Rc::new(MemoryCropper::new());
        let png = test_image(40, 20).encode_png().unwrap();
        cropper.insert("memory://source.png", png);

        let result = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&result);
        cropper.crop_image(
            &rect(10.0, 5.0, 30.0, 15.0, 40.0, 20.0),
            "memory://source.png",
            Box::new(move |r: Result<CroppedImage, CropError>| {
                *slot.borrow_mut() = Some(r)
            }),
        );

        let cropped = result.borrow_mut().take().unwrap().unwrap();
        assert_eq!(cropped.image, "memory://crop/1.png");

        let stored = RasterImage::decode(&cropper.get(&cropped.image).unwrap()).unwrap();
        assert_eq!((stored.width, stored.height), (20, 10));
        assert_eq!(&stored.pixels[0..3], &[10, 5, 0]);
    }

    #[test]
    fn test_memory_cropper_unknown_uri() {
        let cropper = MemoryCropper::new();
        let result = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&result);
        cropper.crop_image(
            &rect(0.0, 0.0, 1.0, 1.0, 1.0, 1.0),
            "memory://missing.png",
            Box::new(move |r: Result<CroppedImage, CropError>| {
                *slot.borrow_mut() = Some(r)
            }),
        );
        let err = result.borrow_mut().take().unwrap().unwrap_err();
        assert_eq!(
            err,
            CropError::Collaborator("Unknown image: memory://missing.png".to_string())
        );
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            RasterImage::decode(b"not an image"),
            Err(RasterError::Decode(_))
        ));
    }
}
