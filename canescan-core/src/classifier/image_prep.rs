//! Preview thumbnails for result display and history entries.
//!
//! Previews are downscaled to at most 320px on the longest edge and stored as
//! JPEG data URLs so a history entry is self-contained.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

use crate::error::{CaneScanError, Result};

/// Maximum dimension (width or height) of a preview thumbnail.
pub const PREVIEW_MAX_DIMENSION: u32 = 320;

/// Encode `img` as a `data:image/jpeg;base64,...` thumbnail.
pub fn preview_data_url(img: &DynamicImage) -> Result<String> {
    let thumb = resize_if_needed(img, PREVIEW_MAX_DIMENSION);
    let jpeg_bytes = encode_to_jpeg(&thumb)?;
    debug!(
        "Encoded {}x{} preview: {} bytes",
        thumb.width(),
        thumb.height(),
        jpeg_bytes.len()
    );
    Ok(format!("data:{};base64,{}", image_media_type(), STANDARD.encode(&jpeg_bytes)))
}

/// Resize image if either dimension exceeds max, maintaining aspect ratio.
fn resize_if_needed(img: &DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = (img.width(), img.height());

    if width <= max_dimension && height <= max_dimension {
        return img.clone();
    }

    let scale = max_dimension as f32 / width.max(height) as f32;
    let new_width = ((width as f32 * scale) as u32).max(1);
    let new_height = ((height as f32 * scale) as u32).max(1);

    img.resize(new_width, new_height, image::imageops::FilterType::Triangle)
}

/// JPEG has no alpha channel, so convert to RGB first.
fn encode_to_jpeg(img: &DynamicImage) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| CaneScanError::InvalidImage(format!("failed to encode preview: {}", e)))?;
    Ok(buffer.into_inner())
}

pub fn image_media_type() -> &'static str {
    "image/jpeg"
}
