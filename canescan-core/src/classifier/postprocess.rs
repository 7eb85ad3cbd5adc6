//! Raw scores → ranked, annotated prediction.

use std::cmp::Ordering;

use super::catalog::ClassCatalog;
use super::types::{PredictionResult, RankedPrediction, RawOutput};
use crate::error::{CaneScanError, Result};

/// Softmax with the maximum logit subtracted before exponentiating.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value; the first one wins on ties.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

pub fn postprocess(raw: &RawOutput, catalog: &ClassCatalog) -> Result<PredictionResult> {
    catalog.check_width(raw.logits.len())?;

    let probabilities = softmax(&raw.logits);
    let top_index = argmax(&probabilities).ok_or(CaneScanError::UnknownClass {
        expected: catalog.len(),
        actual: 0,
    })?;

    let mut ranked: Vec<RankedPrediction> = catalog
        .classes()
        .iter()
        .zip(&probabilities)
        .enumerate()
        .map(|(index, (&class, &probability))| RankedPrediction {
            class,
            index,
            label: class.label(),
            probability,
            info: class.info(),
        })
        .collect();
    // sort_by is stable: equal probabilities keep catalog order.
    ranked.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
    });

    let class = catalog.classes()[top_index];
    let confidence = probabilities[top_index];

    Ok(PredictionResult {
        class,
        index: top_index,
        label: class.label(),
        confidence,
        confidence_percent: format!("{:.2}", confidence * 100.0),
        inference_ms: raw.latency.as_secs_f64() * 1000.0,
        ranked,
        info: class.info(),
    })
}
