//! Local sugarcane leaf disease classification.

pub mod catalog;
pub mod image_prep;
pub mod invoker;
pub mod pipeline;
pub mod postprocess;
pub mod preprocess;
pub mod runtime;
pub mod session;
pub mod source;
pub mod types;

pub use catalog::{ClassCatalog, DiseaseClass, DiseaseInfo};
pub use image_prep::preview_data_url;
pub use pipeline::Classifier;
pub use postprocess::{postprocess, softmax};
pub use preprocess::{preprocess, MODEL_INPUT_SIZE};
pub use runtime::{LoadedModel, ModelRuntime, TractRuntime};
pub use session::{ModelSession, ReadyInfo, SessionState, SessionStatus, DEFAULT_LOAD_TIMEOUT};
pub use source::ImageSource;
pub use types::*;
