use serde::{Deserialize, Serialize};

use crate::classifier::{DiseaseClass, DiseaseInfo, PredictionResult};

/// A saved classification, newest entries first in the stored list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Millisecond timestamp, bumped when needed to stay strictly increasing.
    pub id: i64,
    /// ISO-8601 creation time.
    pub timestamp: String,
    /// Data URL of the preview thumbnail.
    pub image: Option<String>,
    pub disease: String,
    pub confidence: f32,
    pub confidence_percent: String,
}

impl HistoryEntry {
    /// Display metadata for the saved label, if it is still a known class.
    pub fn disease_info(&self) -> Option<DiseaseInfo> {
        DiseaseClass::from_label(&self.disease).map(DiseaseClass::info)
    }
}

/// What the caller supplies when saving; the store fills in id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHistoryEntry {
    pub disease: String,
    pub confidence: f32,
    pub image: Option<String>,
}

impl NewHistoryEntry {
    pub fn from_prediction(prediction: &PredictionResult, image: Option<String>) -> Self {
        Self {
            disease: prediction.label.to_string(),
            confidence: prediction.confidence,
            image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(disease: &str) -> HistoryEntry {
        HistoryEntry {
            id: 1,
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            image: None,
            disease: disease.to_string(),
            confidence: 0.9,
            confidence_percent: "90.00".to_string(),
        }
    }

    #[test]
    fn test_disease_info_for_known_label() {
        let info = entry("Rust").disease_info().unwrap();
        assert_eq!(info, DiseaseClass::Rust.info());
    }

    #[test]
    fn test_disease_info_for_unknown_label() {
        assert!(entry("Smut").disease_info().is_none());
    }
}
