use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a model artifact could not be turned into a runnable session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadFailure {
    #[error("model artifact not found")]
    NotFound,

    #[error("model artifact is malformed: {0}")]
    Malformed(String),

    #[error("inference runtime failed to initialize: {0}")]
    RuntimeInit(String),
}

#[derive(Debug, Error)]
pub enum CaneScanError {
    #[error("Model loading timed out after {timeout_ms} ms")]
    LoadTimeout { timeout_ms: u64 },

    #[error("Failed to load model {path:?}: {cause}")]
    ModelLoadFailure { path: PathBuf, cause: LoadFailure },

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Model not loaded; load the model before classifying")]
    NotReady,

    #[error("Inference failed: {0}")]
    InferenceError(String),

    #[error("Model produces {actual} classes but the catalog defines {expected}")]
    UnknownClass { expected: usize, actual: usize },

    #[error("Config error: {0}")]
    Config(String),

    #[error("History error: {0}")]
    History(String),
}

/// Stable, serializable discriminant of [`CaneScanError`] used by the UI to
/// pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    LoadTimeout,
    ModelLoadFailure,
    UnsupportedFormat,
    InvalidImage,
    NotReady,
    InferenceError,
    UnknownClass,
    Config,
    History,
}

impl CaneScanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CaneScanError::LoadTimeout { .. } => ErrorKind::LoadTimeout,
            CaneScanError::ModelLoadFailure { .. } => ErrorKind::ModelLoadFailure,
            CaneScanError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            CaneScanError::InvalidImage(_) => ErrorKind::InvalidImage,
            CaneScanError::NotReady => ErrorKind::NotReady,
            CaneScanError::InferenceError(_) => ErrorKind::InferenceError,
            CaneScanError::UnknownClass { .. } => ErrorKind::UnknownClass,
            CaneScanError::Config(_) => ErrorKind::Config,
            CaneScanError::History(_) => ErrorKind::History,
        }
    }
}

impl From<rusqlite::Error> for CaneScanError {
    fn from(err: rusqlite::Error) -> Self {
        CaneScanError::History(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CaneScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&CaneScanError::NotReady.kind()).unwrap();
        assert_eq!(json, "\"not_ready\"");

        let err = CaneScanError::UnknownClass {
            expected: 5,
            actual: 6,
        };
        assert_eq!(serde_json::to_string(&err.kind()).unwrap(), "\"unknown_class\"");
    }

    #[test]
    fn test_load_failure_message_names_path_and_reason() {
        let err = CaneScanError::ModelLoadFailure {
            path: PathBuf::from("/models/best.onnx"),
            cause: LoadFailure::NotFound,
        };
        let msg = err.to_string();
        assert!(msg.contains("best.onnx"));
        assert!(msg.contains("not found"));
    }
}
