//! Values passed between pipeline stages.

use std::time::Duration;

use serde::Serialize;

use super::catalog::{DiseaseClass, DiseaseInfo};

/// Planar (CHW) `f32` image tensor, values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    channels: usize,
    height: usize,
    width: usize,
    data: Vec<f32>,
}

impl InputTensor {
    /// Returns `None` when `data` does not hold exactly `channels * height * width` values.
    pub fn from_planar(channels: usize, height: usize, width: usize, data: Vec<f32>) -> Option<Self> {
        if data.len() != channels * height * width {
            return None;
        }
        Some(Self {
            channels,
            height,
            width,
            data,
        })
    }

    /// `[channels, height, width]`
    pub fn shape(&self) -> [usize; 3] {
        [self.channels, self.height, self.width]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Values of one channel in row-major pixel order.
    pub fn channel(&self, c: usize) -> &[f32] {
        let plane = self.height * self.width;
        &self.data[c * plane..(c + 1) * plane]
    }
}

/// Unnormalized scores from one forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOutput {
    pub logits: Vec<f32>,
    pub latency: Duration,
}

/// One entry of the ranked prediction list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPrediction {
    pub class: DiseaseClass,
    /// Position in the catalog / model output.
    pub index: usize,
    pub label: &'static str,
    pub probability: f32,
    pub info: DiseaseInfo,
}

/// Outcome of classifying one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub class: DiseaseClass,
    pub index: usize,
    pub label: &'static str,
    pub confidence: f32,
    /// `confidence * 100` with two decimals, e.g. `"52.84"`.
    pub confidence_percent: String,
    pub inference_ms: f64,
    pub ranked: Vec<RankedPrediction>,
    pub info: DiseaseInfo,
}

/// A prediction together with the preview thumbnail shown beside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub prediction: PredictionResult,
    /// JPEG data URL.
    pub preview: String,
}

impl PredictionResult {
    pub fn probability_sum(&self) -> f32 {
        self.ranked.iter().map(|p| p.probability).sum()
    }
}
