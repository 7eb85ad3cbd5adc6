//! Turns uploaded files and grabbed camera frames into decoded bitmaps.

use image::{DynamicImage, RgbaImage};
use serde::Deserialize;
use tracing::debug;

use crate::error::{CaneScanError, Result};

/// Where an image to classify came from.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    /// Encoded file contents (JPEG, PNG, WebP, ...).
    Encoded { bytes: Vec<u8> },
    /// A still grabbed from a live camera stream at its native resolution.
    Frame { width: u32, height: u32, rgba: Vec<u8> },
}

impl ImageSource {
    pub fn encoded(bytes: impl Into<Vec<u8>>) -> Self {
        ImageSource::Encoded {
            bytes: bytes.into(),
        }
    }

    pub fn frame(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        ImageSource::Frame { width, height, rgba }
    }

    pub fn decode(&self) -> Result<DynamicImage> {
        match self {
            ImageSource::Encoded { bytes } => decode_encoded(bytes),
            ImageSource::Frame {
                width,
                height,
                rgba,
            } => decode_frame(*width, *height, rgba),
        }
    }
}

/// Decode file bytes. Bytes that carry no known image signature are
/// `UnsupportedFormat`; a known format that fails to decode is `InvalidImage`.
pub fn decode_encoded(bytes: &[u8]) -> Result<DynamicImage> {
    let format = image::guess_format(bytes).map_err(|_| {
        CaneScanError::UnsupportedFormat(
            "not a recognized image encoding. Use a JPEG, PNG or WebP photo.".to_string(),
        )
    })?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| CaneScanError::InvalidImage(format!("failed to decode {:?} image: {}", format, e)))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(CaneScanError::InvalidImage("image has zero dimension".to_string()));
    }

    debug!("Decoded {:?} image: {}x{}", format, img.width(), img.height());
    Ok(img)
}

/// Wrap a raw RGBA camera frame.
pub fn decode_frame(width: u32, height: u32, rgba: &[u8]) -> Result<DynamicImage> {
    if width == 0 || height == 0 {
        return Err(CaneScanError::InvalidImage(format!(
            "camera frame has zero dimension: {}x{}",
            width, height
        )));
    }

    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(CaneScanError::InvalidImage(format!(
            "camera frame {}x{} should carry {} bytes, got {}",
            width,
            height,
            expected,
            rgba.len()
        )));
    }

    let buffer = RgbaImage::from_raw(width, height, rgba.to_vec())
        .ok_or_else(|| CaneScanError::InvalidImage("camera frame buffer rejected".to_string()))?;
    Ok(DynamicImage::ImageRgba8(buffer))
}
