//! Model session lifecycle: load once with a timeout, report readiness,
//! dispose on request.
//!
//! A [`ModelSession`] is created empty and shared (usually behind an `Arc`)
//! with everything that needs to run the model. Loading is first-loader-wins:
//! concurrent `load` calls are serialized and every call after a successful
//! load is a no-op that returns the installed session's info.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::catalog::ClassCatalog;
use super::runtime::{LoadedModel, ModelRuntime};
use crate::error::{CaneScanError, Result};

/// Default guard on model loading.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Facts about an installed session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadyInfo {
    pub model_path: PathBuf,
    pub load_ms: u64,
    pub loaded_at: DateTime<Utc>,
    pub classes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

/// Snapshot of the session for status displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub state: SessionState,
    pub ready: Option<ReadyInfo>,
    pub error: Option<String>,
}

enum Slot {
    Unloaded,
    Loading,
    Ready {
        model: Arc<dyn LoadedModel>,
        info: ReadyInfo,
    },
    Failed(String),
}

pub struct ModelSession {
    runtime: Arc<dyn ModelRuntime>,
    catalog: ClassCatalog,
    slot: RwLock<Slot>,
    load_gate: Mutex<()>,
    /// Bumped by `dispose`; a load only installs its outcome if this is
    /// unchanged since it started.
    generation: AtomicU64,
}

impl ModelSession {
    pub fn new(runtime: Arc<dyn ModelRuntime>, catalog: ClassCatalog) -> Self {
        Self {
            runtime,
            catalog,
            slot: RwLock::new(Slot::Unloaded),
            load_gate: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    /// Load the artifact at `path`, giving up after `timeout`.
    ///
    /// On timeout the in-flight load is abandoned and its eventual result is
    /// dropped, so nothing is installed. A loaded model whose declared output
    /// width differs from the catalog is rejected with `UnknownClass`.
    /// A `dispose` while the load is in flight wins: the load returns
    /// `NotReady` and leaves the session unloaded.
    pub async fn load(&self, path: &Path, timeout: Duration) -> Result<ReadyInfo> {
        let _gate = self.load_gate.lock().await;

        if let Some(info) = self.ready_info() {
            debug!("Model already loaded from {:?}; skipping load", info.model_path);
            return Ok(info);
        }

        info!("Loading model from {:?} (timeout {} ms)", path, timeout.as_millis());
        let generation = self.generation.load(Ordering::SeqCst);
        self.set_slot(Slot::Loading);
        let started = Instant::now();

        let runtime = self.runtime.clone();
        let owned_path = path.to_path_buf();
        let task = tokio::task::spawn_blocking(move || runtime.load(&owned_path));

        let outcome = match tokio::time::timeout(timeout, task).await {
            Err(_) => Err(CaneScanError::LoadTimeout {
                timeout_ms: timeout.as_millis() as u64,
            }),
            Ok(Err(join_err)) => Err(CaneScanError::ModelLoadFailure {
                path: path.to_path_buf(),
                cause: crate::error::LoadFailure::RuntimeInit(format!(
                    "loader task failed: {}",
                    join_err
                )),
            }),
            Ok(Ok(Err(cause))) => Err(CaneScanError::ModelLoadFailure {
                path: path.to_path_buf(),
                cause,
            }),
            Ok(Ok(Ok(model))) => self.verify(model),
        };

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) != generation {
            info!("Session disposed while loading {:?}; discarding result", path);
            return Err(CaneScanError::NotReady);
        }

        match outcome {
            Ok(model) => {
                let info = ReadyInfo {
                    model_path: path.to_path_buf(),
                    load_ms: started.elapsed().as_millis() as u64,
                    loaded_at: Utc::now(),
                    classes: self.catalog.len(),
                };
                info!("Model loaded in {} ms", info.load_ms);
                *slot = Slot::Ready {
                    model,
                    info: info.clone(),
                };
                Ok(info)
            }
            Err(e) => {
                match &e {
                    CaneScanError::LoadTimeout { .. } => warn!("{}", e),
                    _ => error!("{}", e),
                }
                *slot = Slot::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn verify(&self, model: Arc<dyn LoadedModel>) -> Result<Arc<dyn LoadedModel>> {
        match model.output_width() {
            Some(width) => self.catalog.check_width(width)?,
            None => warn!("Model does not declare its output width; checking per inference"),
        }
        Ok(model)
    }

    /// Non-blocking readiness query.
    pub fn is_ready(&self) -> bool {
        matches!(*self.read_slot(), Slot::Ready { .. })
    }

    pub fn ready_info(&self) -> Option<ReadyInfo> {
        match &*self.read_slot() {
            Slot::Ready { info, .. } => Some(info.clone()),
            _ => None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match &*self.read_slot() {
            Slot::Unloaded => SessionStatus {
                state: SessionState::Unloaded,
                ready: None,
                error: None,
            },
            Slot::Loading => SessionStatus {
                state: SessionState::Loading,
                ready: None,
                error: None,
            },
            Slot::Ready { info, .. } => SessionStatus {
                state: SessionState::Ready,
                ready: Some(info.clone()),
                error: None,
            },
            Slot::Failed(msg) => SessionStatus {
                state: SessionState::Failed,
                ready: None,
                error: Some(msg.clone()),
            },
        }
    }

    /// Handle to the loaded model, or `NotReady`.
    pub fn model(&self) -> Result<Arc<dyn LoadedModel>> {
        match &*self.read_slot() {
            Slot::Ready { model, .. } => Ok(model.clone()),
            _ => Err(CaneScanError::NotReady),
        }
    }

    /// Drop the loaded model, or cancel a load in flight. Inferences already
    /// holding a handle finish normally; new ones fail with `NotReady` until
    /// the next load.
    pub fn dispose(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::SeqCst);
        match *slot {
            Slot::Ready { .. } => info!("Disposing model session"),
            Slot::Loading => info!("Cancelling in-flight model load"),
            _ => {}
        }
        *slot = Slot::Unloaded;
    }

    fn read_slot(&self) -> std::sync::RwLockReadGuard<'_, Slot> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_slot(&self, value: Slot) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::types::InputTensor;
    use crate::error::LoadFailure;
    use std::sync::atomic::AtomicUsize;

    struct FixedModel(usize);

    impl LoadedModel for FixedModel {
        fn output_width(&self) -> Option<usize> {
            Some(self.0)
        }

        fn forward(&self, _input: &InputTensor) -> anyhow::Result<Vec<f32>> {
            Ok(vec![0.0; self.0])
        }
    }

    struct CountingRuntime {
        width: usize,
        delay: Duration,
        loads: AtomicUsize,
    }

    impl CountingRuntime {
        fn new(width: usize, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                width,
                delay,
                loads: AtomicUsize::new(0),
            })
        }
    }

    impl ModelRuntime for CountingRuntime {
        fn load(&self, _path: &Path) -> std::result::Result<Arc<dyn LoadedModel>, LoadFailure> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            Ok(Arc::new(FixedModel(self.width)))
        }
    }

    struct FailingRuntime(LoadFailure);

    impl ModelRuntime for FailingRuntime {
        fn load(&self, _path: &Path) -> std::result::Result<Arc<dyn LoadedModel>, LoadFailure> {
            Err(self.0.clone())
        }
    }

    fn session_with(runtime: Arc<dyn ModelRuntime>) -> ModelSession {
        ModelSession::new(runtime, ClassCatalog::sugarcane())
    }

    #[tokio::test]
    async fn test_load_installs_session() {
        let session = session_with(CountingRuntime::new(5, Duration::ZERO));
        assert!(!session.is_ready());
        assert!(matches!(session.model(), Err(CaneScanError::NotReady)));

        let info = session
            .load(Path::new("best.onnx"), DEFAULT_LOAD_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(info.model_path, PathBuf::from("best.onnx"));
        assert_eq!(info.classes, 5);
        assert!(session.is_ready());
        assert_eq!(session.status().state, SessionState::Ready);
    }

    #[tokio::test]
    async fn test_second_load_is_noop() {
        let runtime = CountingRuntime::new(5, Duration::ZERO);
        let session = session_with(runtime.clone());

        let first = session.load(Path::new("a.onnx"), DEFAULT_LOAD_TIMEOUT).await.unwrap();
        let second = session.load(Path::new("b.onnx"), DEFAULT_LOAD_TIMEOUT).await.unwrap();

        assert_eq!(runtime.loads.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(second.model_path, PathBuf::from("a.onnx"));
    }

    #[tokio::test]
    async fn test_concurrent_loads_first_wins() {
        let runtime = CountingRuntime::new(5, Duration::from_millis(50));
        let session = Arc::new(session_with(runtime.clone()));

        let a = {
            let s = session.clone();
            tokio::spawn(async move { s.load(Path::new("a.onnx"), DEFAULT_LOAD_TIMEOUT).await })
        };
        let b = {
            let s = session.clone();
            tokio::spawn(async move { s.load(Path::new("a.onnx"), DEFAULT_LOAD_TIMEOUT).await })
        };

        assert!(a.await.unwrap().is_ok());
        assert!(b.await.unwrap().is_ok());
        assert_eq!(runtime.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_leaves_nothing_installed() {
        let session = session_with(CountingRuntime::new(5, Duration::from_millis(400)));

        let started = Instant::now();
        let result = session
            .load(Path::new("slow.onnx"), Duration::from_millis(50))
            .await;
        let elapsed = started.elapsed();

        assert!(matches!(result, Err(CaneScanError::LoadTimeout { timeout_ms: 50 })));
        assert!(elapsed < Duration::from_millis(350), "took {:?}", elapsed);
        assert!(!session.is_ready());

        // The abandoned load finishing later must not install a session.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!session.is_ready());
        assert_eq!(session.status().state, SessionState::Failed);
    }

    #[tokio::test]
    async fn test_load_failures_are_distinct() {
        for cause in [
            LoadFailure::NotFound,
            LoadFailure::Malformed("bad header".to_string()),
            LoadFailure::RuntimeInit("no backend".to_string()),
        ] {
            let session = session_with(Arc::new(FailingRuntime(cause.clone())));
            let err = session
                .load(Path::new("x.onnx"), DEFAULT_LOAD_TIMEOUT)
                .await
                .unwrap_err();
            match err {
                CaneScanError::ModelLoadFailure { cause: got, .. } => assert_eq!(got, cause),
                other => panic!("unexpected error: {other:?}"),
            }
            assert!(!session.is_ready());
            assert!(session.status().error.is_some());
        }
    }

    #[tokio::test]
    async fn test_width_mismatch_rejected_at_load() {
        let session = session_with(CountingRuntime::new(6, Duration::ZERO));
        let err = session
            .load(Path::new("wide.onnx"), DEFAULT_LOAD_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, CaneScanError::UnknownClass { expected: 5, actual: 6 }));
        assert!(!session.is_ready());
    }

    #[tokio::test]
    async fn test_dispose_then_reload() {
        let runtime = CountingRuntime::new(5, Duration::ZERO);
        let session = session_with(runtime.clone());

        session.load(Path::new("a.onnx"), DEFAULT_LOAD_TIMEOUT).await.unwrap();
        session.dispose();
        assert!(!session.is_ready());
        assert_eq!(session.status().state, SessionState::Unloaded);

        session.load(Path::new("a.onnx"), DEFAULT_LOAD_TIMEOUT).await.unwrap();
        assert!(session.is_ready());
        assert_eq!(runtime.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let runtime = CountingRuntime::new(5, Duration::from_millis(200));
        let session = session_with(runtime.clone());

        assert!(session.load(Path::new("a.onnx"), Duration::from_millis(20)).await.is_err());
        assert!(session.load(Path::new("a.onnx"), DEFAULT_LOAD_TIMEOUT).await.is_ok());
        assert!(session.is_ready());
    }

    #[tokio::test]
    async fn test_status_reports_loading_in_flight() {
        let session = Arc::new(session_with(CountingRuntime::new(5, Duration::from_millis(200))));
        let pending = {
            let s = session.clone();
            tokio::spawn(async move { s.load(Path::new("a.onnx"), DEFAULT_LOAD_TIMEOUT).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        let status = session.status();
        assert_eq!(status.state, SessionState::Loading);
        assert!(status.ready.is_none());
        assert!(!session.is_ready());

        assert!(pending.await.unwrap().is_ok());
        assert_eq!(session.status().state, SessionState::Ready);
    }

    #[tokio::test]
    async fn test_dispose_during_load_wins() {
        let session = Arc::new(session_with(CountingRuntime::new(5, Duration::from_millis(200))));
        let pending = {
            let s = session.clone();
            tokio::spawn(async move { s.load(Path::new("a.onnx"), DEFAULT_LOAD_TIMEOUT).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(session.status().state, SessionState::Loading);
        session.dispose();
        assert_eq!(session.status().state, SessionState::Unloaded);

        let result = pending.await.unwrap();
        assert!(matches!(result, Err(CaneScanError::NotReady)));
        assert!(!session.is_ready());
        assert_eq!(session.status().state, SessionState::Unloaded);
    }

    #[tokio::test]
    async fn test_load_after_cancelled_load_succeeds() {
        let runtime = CountingRuntime::new(5, Duration::from_millis(100));
        let session = Arc::new(session_with(runtime.clone()));
        let pending = {
            let s = session.clone();
            tokio::spawn(async move { s.load(Path::new("a.onnx"), DEFAULT_LOAD_TIMEOUT).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        session.dispose();
        let reloaded = session.load(Path::new("a.onnx"), DEFAULT_LOAD_TIMEOUT).await;

        assert!(pending.await.unwrap().is_err());
        assert!(reloaded.is_ok());
        assert!(session.is_ready());
        assert_eq!(runtime.loads.load(Ordering::SeqCst), 2);
    }
}
