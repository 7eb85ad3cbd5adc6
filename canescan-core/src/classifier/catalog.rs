//! Disease classes the model distinguishes and the guidance shown for each.
//!
//! The order of [`DiseaseClass::ALL`] is the order the model was trained with:
//! output position `i` of the network is the probability of `ALL[i]`.

use serde::{Deserialize, Serialize};

use crate::error::{CaneScanError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiseaseClass {
    Healthy,
    Mosaic,
    Redrot,
    Rust,
    Yellow,
}

/// Display metadata attached to every prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiseaseInfo {
    pub color: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub treatment: &'static str,
}

impl DiseaseClass {
    /// Training order. Do not reorder.
    pub const ALL: [DiseaseClass; 5] = [
        DiseaseClass::Healthy,
        DiseaseClass::Mosaic,
        DiseaseClass::Redrot,
        DiseaseClass::Rust,
        DiseaseClass::Yellow,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DiseaseClass::Healthy => "Healthy",
            DiseaseClass::Mosaic => "Mosaic",
            DiseaseClass::Redrot => "Redrot",
            DiseaseClass::Rust => "Rust",
            DiseaseClass::Yellow => "Yellow",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn info(self) -> DiseaseInfo {
        match self {
            DiseaseClass::Healthy => DiseaseInfo {
                color: "#10b981",
                icon: "\u{2713}",
                description: "The leaf appears healthy with no visible disease symptoms.",
                treatment: "Continue regular crop maintenance and monitoring.",
            },
            DiseaseClass::Mosaic => DiseaseInfo {
                color: "#f59e0b",
                icon: "\u{26a0}",
                description: "Mosaic disease causes yellowing and stunted growth.",
                treatment: "Remove infected plants, control aphid vectors, use resistant varieties.",
            },
            DiseaseClass::Redrot => DiseaseInfo {
                color: "#ef4444",
                icon: "\u{2717}",
                description: "Redrot causes reddening of leaves and stem rot.",
                treatment: "Improve drainage, use fungicides, remove infected stalks, crop rotation.",
            },
            DiseaseClass::Rust => DiseaseInfo {
                color: "#d97706",
                icon: "!",
                description: "Rust disease causes orange-brown pustules on leaves.",
                treatment: "Apply fungicides, remove infected leaves, ensure proper spacing.",
            },
            DiseaseClass::Yellow => DiseaseInfo {
                color: "#eab308",
                icon: "\u{26a0}",
                description: "Yellow leaf disease causes yellowing and leaf death.",
                treatment: "Control aphid vectors, use resistant varieties, remove infected plants.",
            },
        }
    }
}

/// Ordered list of classes matching the model's output positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCatalog {
    classes: Vec<DiseaseClass>,
}

impl ClassCatalog {
    /// Build a catalog from an explicit order. Empty or duplicated entries
    /// would make output positions ambiguous and are rejected.
    pub fn new(classes: Vec<DiseaseClass>) -> Result<Self> {
        if classes.is_empty() {
            return Err(CaneScanError::Config("class catalog is empty".to_string()));
        }
        for (i, class) in classes.iter().enumerate() {
            if classes[..i].contains(class) {
                return Err(CaneScanError::Config(format!(
                    "class {} appears more than once in the catalog",
                    class.label()
                )));
            }
        }
        Ok(Self { classes })
    }

    /// The five-class sugarcane catalog the bundled model was trained on.
    pub fn sugarcane() -> Self {
        Self {
            classes: DiseaseClass::ALL.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<DiseaseClass> {
        self.classes.get(index).copied()
    }

    pub fn classes(&self) -> &[DiseaseClass] {
        &self.classes
    }

    /// Fail loudly when a model's output width disagrees with the catalog.
    pub fn check_width(&self, width: usize) -> Result<()> {
        if width != self.classes.len() {
            return Err(CaneScanError::UnknownClass {
                expected: self.classes.len(),
                actual: width,
            });
        }
        Ok(())
    }
}

impl Default for ClassCatalog {
    fn default() -> Self {
        Self::sugarcane()
    }
}
