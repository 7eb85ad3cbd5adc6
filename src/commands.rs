use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::camera::Frame;
use crate::encoding::base64_encode;
use crate::errors::{AppError, ErrorKind};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "core"], catch)]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;
}

async fn call<A: Serialize, T: DeserializeOwned>(cmd: &str, args: &A) -> Result<T, AppError> {
    let args = serde_wasm_bindgen::to_value(args)
        .map_err(|e| AppError::new(ErrorKind::Unknown, e.to_string()))?;
    let result = invoke(cmd, args).await.map_err(AppError::from_js)?;
    serde_wasm_bindgen::from_value(result)
        .map_err(|e| AppError::new(ErrorKind::Unknown, format!("Failed to parse response: {}", e)))
}

// -- Types matching backend structs --

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiseaseInfo {
    pub color: String,
    pub icon: String,
    pub description: String,
    pub treatment: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RankedPrediction {
    pub class: String,
    pub index: usize,
    pub label: String,
    pub probability: f32,
    pub info: DiseaseInfo,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResult {
    pub class: String,
    pub index: usize,
    pub label: String,
    pub confidence: f32,
    pub confidence_percent: String,
    pub inference_ms: f64,
    pub ranked: Vec<RankedPrediction>,
    pub info: DiseaseInfo,
}

/// Prediction plus the JPEG data-URL thumbnail of the classified image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Classification {
    pub prediction: PredictionResult,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub timestamp: String,
    pub image: Option<String>,
    pub disease: String,
    pub confidence: f32,
    pub confidence_percent: String,
    /// Present when the saved label is a known class.
    #[serde(default)]
    pub info: Option<DiseaseInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewHistoryEntry {
    pub disease: String,
    pub confidence: f32,
    pub image: Option<String>,
}

impl NewHistoryEntry {
    pub fn from_classification(c: &Classification) -> Self {
        Self {
            disease: c.prediction.label.clone(),
            confidence: c.prediction.confidence,
            image: Some(c.preview.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReadyInfo {
    pub model_path: String,
    pub load_ms: u64,
    pub loaded_at: String,
    pub classes: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionStatus {
    pub state: SessionState,
    pub ready: Option<ReadyInfo>,
    pub error: Option<String>,
}

// -- Arg structs for serialization --

#[derive(Serialize)]
struct NoArgs {}

#[derive(Serialize)]
struct GetPreferenceArgs {
    key: String,
}

#[derive(Serialize)]
struct SetPreferenceArgs {
    key: String,
    value: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyImageArgs {
    image_base64: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyFrameArgs {
    width: u32,
    height: u32,
    rgba_base64: String,
}

#[derive(Serialize)]
struct HistoryEntryArgs {
    id: i64,
}

#[derive(Serialize)]
struct SaveToHistoryArgs {
    entry: NewHistoryEntry,
}

// -- Typed invoke helpers --

pub async fn get_preference(key: &str) -> Result<Option<String>, AppError> {
    call("get_preference", &GetPreferenceArgs { key: key.to_string() }).await
}

pub async fn set_preference(key: &str, value: &str) -> Result<(), AppError> {
    call(
        "set_preference",
        &SetPreferenceArgs {
            key: key.to_string(),
            value: value.to_string(),
        },
    )
    .await
}

pub async fn get_model_status() -> Result<SessionStatus, AppError> {
    call("get_model_status", &NoArgs {}).await
}

/// Dispose and reload the model; resolves once the new session is ready.
pub async fn reload_model() -> Result<ReadyInfo, AppError> {
    call("reload_model", &NoArgs {}).await
}

pub async fn classify_image(image_base64: String) -> Result<Classification, AppError> {
    call("classify_image", &ClassifyImageArgs { image_base64 }).await
}

pub async fn classify_frame(frame: Frame) -> Result<Classification, AppError> {
    let args = ClassifyFrameArgs {
        width: frame.width,
        height: frame.height,
        rgba_base64: base64_encode(&frame.rgba),
    };
    call("classify_frame", &args).await
}

/// Saved results, newest first.
pub async fn list_history() -> Result<Vec<HistoryEntry>, AppError> {
    call("list_history", &NoArgs {}).await
}

pub async fn get_history_entry(id: i64) -> Result<Option<HistoryEntry>, AppError> {
    call("get_history_entry", &HistoryEntryArgs { id }).await
}

pub async fn save_to_history(entry: NewHistoryEntry) -> Result<HistoryEntry, AppError> {
    call("save_to_history", &SaveToHistoryArgs { entry }).await
}

pub async fn clear_history() -> Result<(), AppError> {
    call("clear_history", &NoArgs {}).await
}
