//! Classifier configuration.
//!
//! Resolution order: built-in defaults, then an optional `canescan.toml`,
//! then the `CANESCAN_MODEL_PATH` environment variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CaneScanError, Result};
use crate::history::HISTORY_CAPACITY;

/// Environment variable overriding the model artifact path.
pub const MODEL_PATH_ENV: &str = "CANESCAN_MODEL_PATH";

pub const CONFIG_FILE_NAME: &str = "canescan.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// ONNX artifact. Relative paths are resolved against the app resource dir.
    pub model_path: PathBuf,
    pub load_timeout_ms: u64,
    pub history_capacity: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/best.onnx"),
            load_timeout_ms: 15_000,
            history_capacity: HISTORY_CAPACITY,
        }
    }
}

impl ClassifierConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ClassifierConfig = toml::from_str(content)
            .map_err(|e| CaneScanError::Config(format!("Invalid {}: {}", CONFIG_FILE_NAME, e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}; using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| CaneScanError::Config(format!("Failed to read {:?}: {}", path, e)))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// `<config dir>/canescan/canescan.toml`, when the platform has a config dir.
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("canescan").join(CONFIG_FILE_NAME))
    }

    /// Defaults, overlaid with the user config file and the environment.
    pub fn resolve() -> Result<Self> {
        let mut config = match Self::default_location() {
            Some(path) => Self::load_or_default(&path)?,
            None => Self::default(),
        };
        config.apply_env_override(std::env::var(MODEL_PATH_ENV).ok());
        Ok(config)
    }

    pub fn apply_env_override(&mut self, model_path: Option<String>) {
        if let Some(path) = model_path.filter(|p| !p.trim().is_empty()) {
            info!("Model path overridden by {}: {}", MODEL_PATH_ENV, path);
            self.model_path = PathBuf::from(path);
        }
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    /// Absolute model path, joining relative paths onto `base`.
    pub fn model_path_in(&self, base: &Path) -> PathBuf {
        if self.model_path.is_absolute() {
            self.model_path.clone()
        } else {
            base.join(&self.model_path)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.load_timeout_ms == 0 {
            return Err(CaneScanError::Config("load_timeout_ms must be positive".to_string()));
        }
        if self.history_capacity == 0 {
            return Err(CaneScanError::Config("history_capacity must be positive".to_string()));
        }
        if self.model_path.as_os_str().is_empty() {
            return Err(CaneScanError::Config("model_path must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.model_path, PathBuf::from("models/best.onnx"));
        assert_eq!(config.load_timeout(), Duration::from_secs(15));
        assert_eq!(config.history_capacity, 50);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ClassifierConfig::from_toml_str("load_timeout_ms = 3000\n").unwrap();
        assert_eq!(config.load_timeout_ms, 3000);
        assert_eq!(config.model_path, PathBuf::from("models/best.onnx"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let result = ClassifierConfig::from_toml_str("load_timeout_ms = 0\n");
        assert!(matches!(result, Err(CaneScanError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_toml() {
        let result = ClassifierConfig::from_toml_str("load_timeout_ms = \"soon\"\n");
        assert!(matches!(result, Err(CaneScanError::Config(msg)) if msg.contains(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ClassifierConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ClassifierConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "model_path = \"/opt/models/cane.onnx\"\nhistory_capacity = 10\n").unwrap();

        let config = ClassifierConfig::load_or_default(&path).unwrap();
        assert_eq!(config.model_path, PathBuf::from("/opt/models/cane.onnx"));
        assert_eq!(config.history_capacity, 10);
    }

    #[test]
    fn test_env_override() {
        let mut config = ClassifierConfig::default();
        config.apply_env_override(Some("  ".to_string()));
        assert_eq!(config.model_path, PathBuf::from("models/best.onnx"));

        config.apply_env_override(Some("/tmp/other.onnx".to_string()));
        assert_eq!(config.model_path, PathBuf::from("/tmp/other.onnx"));
    }

    #[test]
    fn test_model_path_resolution() {
        let config = ClassifierConfig::default();
        assert_eq!(
            config.model_path_in(Path::new("/app/resources")),
            PathBuf::from("/app/resources/models/best.onnx")
        );
    }
}
