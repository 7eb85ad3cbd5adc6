//! Byte payloads for command arguments.

use js_sys::{ArrayBuffer, Uint8Array};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::errors::{AppError, ErrorKind};

/// Read a picked or dropped file as base64.
pub async fn read_file_as_base64(file: web_sys::File) -> Result<String, AppError> {
    let array_buffer: ArrayBuffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| AppError::new(ErrorKind::InvalidImage, format!("Failed to read file: {:?}", e)))?
        .dyn_into()
        .map_err(|_| AppError::new(ErrorKind::InvalidImage, "Failed to convert to ArrayBuffer"))?;

    let bytes = Uint8Array::new(&array_buffer).to_vec();
    Ok(base64_encode(&bytes))
}

/// Standard padded base64, kept local to avoid another WASM dependency.
pub fn base64_encode(bytes: &[u8]) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let mut result = String::with_capacity(bytes.len().div_ceil(3) * 4);

    for chunk in bytes.chunks(3) {
        let b0 = chunk[0] as usize;
        let b1 = chunk.get(1).copied().unwrap_or(0) as usize;
        let b2 = chunk.get(2).copied().unwrap_or(0) as usize;

        result.push(ALPHABET[b0 >> 2] as char);
        result.push(ALPHABET[((b0 & 0x03) << 4) | (b1 >> 4)] as char);
        result.push(if chunk.len() > 1 {
            ALPHABET[((b1 & 0x0f) << 2) | (b2 >> 6)] as char
        } else {
            '='
        });
        result.push(if chunk.len() > 2 {
            ALPHABET[b2 & 0x3f] as char
        } else {
            '='
        });
    }

    result
}
