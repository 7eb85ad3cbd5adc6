use std::time::Instant;

use tracing::debug;

use super::session::ModelSession;
use super::types::{InputTensor, RawOutput};
use crate::error::{CaneScanError, Result};

/// Run exactly one forward pass over `tensor`.
///
/// Readiness is checked before anything else. Every call is a full,
/// independent pass; nothing is cached between calls.
pub fn run(session: &ModelSession, tensor: &InputTensor) -> Result<RawOutput> {
    let model = session.model()?;

    let started = Instant::now();
    let logits = model
        .forward(tensor)
        .map_err(|e| CaneScanError::InferenceError(format!("{:#}", e)))?;
    let latency = started.elapsed();

    if let Some(bad) = logits.iter().position(|v| !v.is_finite()) {
        return Err(CaneScanError::InferenceError(format!(
            "model produced a non-finite score at position {}",
            bad
        )));
    }

    debug!(
        "Forward pass produced {} scores in {:.1} ms",
        logits.len(),
        latency.as_secs_f64() * 1000.0
    );
    Ok(RawOutput { logits, latency })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::catalog::ClassCatalog;
    use crate::classifier::runtime::{LoadedModel, ModelRuntime};
    use crate::classifier::session::DEFAULT_LOAD_TIMEOUT;
    use crate::error::LoadFailure;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedModel {
        logits: Vec<f32>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl LoadedModel for ScriptedModel {
        fn output_width(&self) -> Option<usize> {
            None
        }

        fn forward(&self, _input: &InputTensor) -> anyhow::Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("shape mismatch: expected [1,3,224,224]");
            }
            Ok(self.logits.clone())
        }
    }

    struct ScriptedRuntime(Arc<ScriptedModel>);

    impl ModelRuntime for ScriptedRuntime {
        fn load(&self, _path: &Path) -> std::result::Result<Arc<dyn LoadedModel>, LoadFailure> {
            Ok(self.0.clone())
        }
    }

    async fn ready_session(model: Arc<ScriptedModel>) -> ModelSession {
        let session = ModelSession::new(Arc::new(ScriptedRuntime(model)), ClassCatalog::sugarcane());
        session.load(Path::new("m.onnx"), DEFAULT_LOAD_TIMEOUT).await.unwrap();
        session
    }

    fn model(logits: Vec<f32>, fail: bool) -> Arc<ScriptedModel> {
        Arc::new(ScriptedModel {
            logits,
            fail,
            calls: AtomicUsize::new(0),
        })
    }

    fn tensor() -> InputTensor {
        InputTensor::from_planar(3, 2, 2, vec![0.0; 12]).unwrap()
    }

    #[test]
    fn test_not_ready_before_load() {
        let m = model(vec![1.0; 5], false);
        let session = ModelSession::new(Arc::new(ScriptedRuntime(m.clone())), ClassCatalog::sugarcane());
        assert!(matches!(run(&session, &tensor()), Err(CaneScanError::NotReady)));
        assert_eq!(m.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_returns_logits() {
        let session = ready_session(model(vec![2.0, 0.5, 0.5, 0.5, 0.5], false)).await;
        let output = run(&session, &tensor()).unwrap();
        assert_eq!(output.logits, vec![2.0, 0.5, 0.5, 0.5, 0.5]);
    }

    #[tokio::test]
    async fn test_every_call_runs_the_model() {
        let m = model(vec![0.0; 5], false);
        let session = ready_session(m.clone()).await;
        run(&session, &tensor()).unwrap();
        run(&session, &tensor()).unwrap();
        assert_eq!(m.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_runtime_fault_is_inference_error() {
        let session = ready_session(model(vec![], true)).await;
        let err = run(&session, &tensor()).unwrap_err();
        assert!(matches!(err, CaneScanError::InferenceError(msg) if msg.contains("shape mismatch")));
    }

    #[tokio::test]
    async fn test_non_finite_output_is_inference_error() {
        let session = ready_session(model(vec![0.0, f32::NAN, 0.0, 0.0, 0.0], false)).await;
        let err = run(&session, &tensor()).unwrap_err();
        assert!(matches!(err, CaneScanError::InferenceError(msg) if msg.contains("position 1")));
    }
}
