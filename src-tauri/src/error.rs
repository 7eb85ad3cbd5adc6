use canescan_core::{CaneScanError, ErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Error returned by every command. Serialized to the UI as
/// `{ "kind": "...", "message": "..." }`.
#[derive(Debug, Error, Serialize)]
#[error("{message}")]
pub struct CommandError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CommandError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn history(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::History, message)
    }
}

impl From<CaneScanError> for CommandError {
    fn from(err: CaneScanError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
