//! Seam between the pipeline and the inference engine.
//!
//! [`ModelRuntime`] turns an artifact path into a [`LoadedModel`]; the
//! production implementation is [`TractRuntime`], which runs ONNX graphs with
//! `tract-onnx`. Loading and forward passes are blocking calls; the session
//! and pipeline move them onto tokio's blocking pool.

use std::path::Path;
use std::sync::Arc;

use tract_onnx::prelude::*;
use tracing::debug;

use super::preprocess::{CHANNELS, MODEL_INPUT_SIZE};
use super::types::InputTensor;
use crate::error::LoadFailure;

/// A model ready to execute forward passes. Implementations must be safe to
/// call from several threads at once.
pub trait LoadedModel: Send + Sync {
    /// Number of class scores per forward pass, when the artifact declares it.
    fn output_width(&self) -> Option<usize>;

    /// One forward pass over a single image, returning raw scores.
    fn forward(&self, input: &InputTensor) -> anyhow::Result<Vec<f32>>;
}

/// Loads model artifacts.
pub trait ModelRuntime: Send + Sync {
    fn load(&self, path: &Path) -> Result<Arc<dyn LoadedModel>, LoadFailure>;
}

/// ONNX runtime backed by tract.
#[derive(Debug, Clone)]
pub struct TractRuntime {
    input_size: u32,
}

impl TractRuntime {
    pub fn new() -> Self {
        Self {
            input_size: MODEL_INPUT_SIZE,
        }
    }
}

impl Default for TractRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRuntime for TractRuntime {
    fn load(&self, path: &Path) -> Result<Arc<dyn LoadedModel>, LoadFailure> {
        if !path.is_file() {
            return Err(LoadFailure::NotFound);
        }

        let size = self.input_size as usize;
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| LoadFailure::Malformed(format!("{:#}", e)))?;

        let typed = model
            .with_input_fact(0, f32::fact([1, CHANNELS, size, size]).into())
            .and_then(|m| m.into_optimized())
            .map_err(|e| LoadFailure::RuntimeInit(format!("{:#}", e)))?;

        let output_width = typed
            .output_fact(0)
            .ok()
            .and_then(|fact| fact.shape.as_concrete().and_then(|dims| dims.last().copied()));
        debug!("ONNX model output width: {:?}", output_width);

        let plan = typed
            .into_runnable()
            .map_err(|e| LoadFailure::RuntimeInit(format!("{:#}", e)))?;

        Ok(Arc::new(TractModel { plan, output_width }))
    }
}

struct TractModel {
    plan: TypedRunnableModel<TypedModel>,
    output_width: Option<usize>,
}

impl LoadedModel for TractModel {
    fn output_width(&self) -> Option<usize> {
        self.output_width
    }

    fn forward(&self, input: &InputTensor) -> anyhow::Result<Vec<f32>> {
        let [c, h, w] = input.shape();
        let array = tract_ndarray::Array4::from_shape_vec((1, c, h, w), input.data().to_vec())?;
        let tensor: Tensor = array.into();

        let outputs = self.plan.run(tvec!(tensor.into()))?;
        let first = outputs
            .first()
            .ok_or_else(|| anyhow::anyhow!("model produced no outputs"))?;
        let scores = first.to_array_view::<f32>()?;
        Ok(scores.iter().copied().collect())
    }
}
