//! Shared application state managed by Tauri.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use canescan_core::{ClassCatalog, Classifier, ClassifierConfig, HistoryStore, ModelSession, TractRuntime};

use crate::error::CommandResult;

pub const HISTORY_DB_FILE: &str = "canescan.db";

pub struct AppState {
    pub classifier: Classifier,
    pub config: ClassifierConfig,
    /// Model artifact with relative config paths resolved.
    pub model_path: PathBuf,
    pub history_db: PathBuf,
}

impl AppState {
    pub fn new(config: ClassifierConfig, resource_dir: &Path, data_dir: &Path) -> Self {
        let session = Arc::new(ModelSession::new(
            Arc::new(TractRuntime::new()),
            ClassCatalog::sugarcane(),
        ));
        Self {
            classifier: Classifier::new(session),
            model_path: config.model_path_in(resource_dir),
            history_db: data_dir.join(HISTORY_DB_FILE),
            config,
        }
    }

    pub fn session(&self) -> &Arc<ModelSession> {
        self.classifier.session()
    }

    pub fn open_history(&self) -> CommandResult<HistoryStore> {
        Ok(HistoryStore::new(&self.history_db)?.with_capacity(self.config.history_capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_resolved_from_dirs() {
        let state = AppState::new(
            ClassifierConfig::default(),
            Path::new("/opt/canescan/resources"),
            Path::new("/home/u/.local/share/canescan"),
        );
        assert_eq!(
            state.model_path,
            PathBuf::from("/opt/canescan/resources/models/best.onnx")
        );
        assert_eq!(
            state.history_db,
            PathBuf::from("/home/u/.local/share/canescan/canescan.db")
        );
        assert!(!state.session().is_ready());
    }

    #[test]
    fn test_history_uses_configured_capacity() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ClassifierConfig {
            history_capacity: 3,
            ..ClassifierConfig::default()
        };
        let state = AppState::new(config, dir.path(), dir.path());
        assert_eq!(state.open_history().unwrap().capacity(), 3);
    }
}
