//! Uploaded images, kept as embeddable data URIs
//!
//! Format: "data:image/png;base64,..."

use std::fs;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{GenericImageView, ImageFormat};
use serde::{Deserialize, Serialize};

use crate::error::{PassError, Result};

/// A decoded upload, ready to embed in a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub data_uri: String,
}

impl ImageRef {
    /// Decodes `bytes` and wraps them as a data URI.
    ///
    /// The payload has to actually decode; a file that merely looks like a PNG
    /// by its magic bytes is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes)?;
        if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP) {
            return Err(PassError::UnsupportedImage(format!("{format:?}")));
        }

        let (width, height) = image::load_from_memory_with_format(bytes, format)?.dimensions();
        let mime = format.to_mime_type().to_string();
        let data_uri = format!("data:{};base64,{}", mime, STANDARD.encode(bytes));

        Ok(Self {
            mime,
            width,
            height,
            data_uri,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Short human-readable description for the UI, e.g. `image/png 640x480`.
    pub fn describe(&self) -> String {
        format!("{} {}x{}", self.mime, self.width, self.height)
    }
}

#[cfg(test)]
pub(crate) fn test_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([212, 175, 55]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}
