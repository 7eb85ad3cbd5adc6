//! Tauri commands that run the classification pipeline.

use base64::{engine::general_purpose::STANDARD, Engine};
use canescan_core::classifier::Classification;
use canescan_core::{CaneScanError, ImageSource};
use tauri::State;
use tracing::info;

use crate::error::CommandResult;
use crate::state::AppState;

/// Classify an uploaded or dropped image file.
#[tauri::command]
pub async fn classify_image(
    state: State<'_, AppState>,
    image_base64: String,
) -> CommandResult<Classification> {
    let bytes = decode_payload(&image_base64)?;
    info!("Classifying uploaded image ({} bytes)", bytes.len());
    let classification = state
        .classifier
        .classify_with_preview(ImageSource::encoded(bytes))
        .await?;
    Ok(classification)
}

/// Classify a still frame grabbed from the camera as raw RGBA.
#[tauri::command]
pub async fn classify_frame(
    state: State<'_, AppState>,
    width: u32,
    height: u32,
    rgba_base64: String,
) -> CommandResult<Classification> {
    let rgba = decode_payload(&rgba_base64)?;
    info!("Classifying camera frame {}x{}", width, height);
    let classification = state
        .classifier
        .classify_with_preview(ImageSource::frame(width, height, rgba))
        .await?;
    Ok(classification)
}

fn decode_payload(data: &str) -> Result<Vec<u8>, CaneScanError> {
    // Accept either raw base64 or a full data URL.
    let payload = match data.split_once(";base64,") {
        Some((_, rest)) => rest,
        None => data,
    };
    STANDARD
        .decode(payload.trim())
        .map_err(|e| CaneScanError::InvalidImage(format!("image payload is not valid base64: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_raw_and_data_url() {
        assert_eq!(decode_payload("AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(
            decode_payload("data:image/png;base64,AQID").unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_bad_payload_is_invalid_image() {
        let err = decode_payload("not base64!").unwrap_err();
        assert!(matches!(err, CaneScanError::InvalidImage(_)));
    }
}
