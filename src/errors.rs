//! Errors as the UI sees them: every backend command rejects with
//! `{ kind, message }`, camera failures are classified locally.

use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::i18n::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    LoadTimeout,
    ModelLoadFailure,
    PermissionDenied,
    DeviceNotFound,
    DeviceBusy,
    UnsupportedFormat,
    InvalidImage,
    NotReady,
    InferenceError,
    UnknownClass,
    Config,
    History,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Interpret a rejected `invoke` promise.
    pub fn from_js(value: JsValue) -> Self {
        if let Some(text) = value.as_string() {
            return Self::new(ErrorKind::Unknown, text);
        }
        serde_wasm_bindgen::from_value(value)
            .unwrap_or_else(|e| Self::new(ErrorKind::Unknown, format!("Unreadable error: {}", e)))
    }

    /// Localized headline for this kind of failure.
    pub fn headline(&self, locale: Locale) -> &'static str {
        let errors = &locale.text().errors;
        match self.kind {
            ErrorKind::LoadTimeout => errors.load_timeout,
            ErrorKind::ModelLoadFailure => errors.model_load_failure,
            ErrorKind::PermissionDenied => errors.permission_denied,
            ErrorKind::DeviceNotFound => errors.device_not_found,
            ErrorKind::DeviceBusy => errors.device_busy,
            ErrorKind::UnsupportedFormat => errors.unsupported_format,
            ErrorKind::InvalidImage => errors.invalid_image,
            ErrorKind::NotReady => errors.not_ready,
            ErrorKind::InferenceError => errors.inference_error,
            ErrorKind::UnknownClass => errors.unknown_class,
            ErrorKind::Config => errors.config,
            ErrorKind::History => errors.history,
            ErrorKind::Unknown => errors.unknown,
        }
    }

    /// Camera failures are fully described by the headline.
    pub fn is_camera(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::PermissionDenied | ErrorKind::DeviceNotFound | ErrorKind::DeviceBusy
        )
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_command_error() {
        let err: AppError =
            serde_json::from_str(r#"{"kind":"not_ready","message":"Model not loaded"}"#).unwrap();
        assert_eq!(err.kind, ErrorKind::NotReady);
        assert_eq!(err.message, "Model not loaded");
    }

    #[test]
    fn test_unknown_kind_is_tolerated() {
        let err: AppError = serde_json::from_str(r#"{"kind":"brand_new","message":"x"}"#).unwrap();
        assert_eq!(err.kind, ErrorKind::Unknown);
    }

    #[test]
    fn test_every_kind_has_distinct_headline() {
        let kinds = [
            ErrorKind::LoadTimeout,
            ErrorKind::ModelLoadFailure,
            ErrorKind::PermissionDenied,
            ErrorKind::DeviceNotFound,
            ErrorKind::DeviceBusy,
            ErrorKind::UnsupportedFormat,
            ErrorKind::InvalidImage,
            ErrorKind::NotReady,
            ErrorKind::InferenceError,
            ErrorKind::UnknownClass,
        ];
        for locale in [Locale::En, Locale::Zh] {
            let mut headlines: Vec<&str> = kinds
                .iter()
                .map(|k| AppError::new(*k, "").headline(locale))
                .collect();
            headlines.sort();
            headlines.dedup();
            assert_eq!(headlines.len(), kinds.len());
        }
    }
}
