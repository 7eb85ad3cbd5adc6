//! Sugarcane leaf disease classification: image decoding, preprocessing,
//! ONNX inference, postprocessing, and a capped local result history.

pub mod classifier;
pub mod config;
pub mod error;
pub mod history;

pub use classifier::{
    Classifier, ClassCatalog, DiseaseClass, ImageSource, ModelSession, PredictionResult,
    TractRuntime,
};
pub use config::ClassifierConfig;
pub use error::{CaneScanError, ErrorKind, LoadFailure, Result};
pub use history::{HistoryEntry, HistoryStore, NewHistoryEntry};
