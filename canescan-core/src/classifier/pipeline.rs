//! End-to-end classification: source → bitmap → tensor → forward pass →
//! ranked prediction.

use std::sync::Arc;

use image::DynamicImage;
use tracing::info;

use super::image_prep::preview_data_url;
use super::invoker;
use super::postprocess::postprocess;
use super::preprocess::preprocess;
use super::session::ModelSession;
use super::source::ImageSource;
use super::types::{Classification, PredictionResult};
use crate::error::{CaneScanError, Result};

/// Runs the classification pipeline against a shared [`ModelSession`].
///
/// Calls are independent: overlapping requests each get their own tensor and
/// forward pass over the same read-only model.
#[derive(Clone)]
pub struct Classifier {
    session: Arc<ModelSession>,
}

impl Classifier {
    pub fn new(session: Arc<ModelSession>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<ModelSession> {
        &self.session
    }

    /// Classify on tokio's blocking pool.
    pub async fn classify(&self, source: ImageSource) -> Result<PredictionResult> {
        let classifier = self.clone();
        tokio::task::spawn_blocking(move || classifier.classify_blocking(&source))
            .await
            .map_err(|e| CaneScanError::InferenceError(format!("classification task failed: {}", e)))?
    }

    /// Classify and also return a preview thumbnail of the decoded image.
    pub async fn classify_with_preview(&self, source: ImageSource) -> Result<Classification> {
        let classifier = self.clone();
        tokio::task::spawn_blocking(move || {
            let (image, prediction) = classifier.decode_and_classify(&source)?;
            let preview = preview_data_url(&image)?;
            Ok(Classification { prediction, preview })
        })
        .await
        .map_err(|e| CaneScanError::InferenceError(format!("classification task failed: {}", e)))?
    }

    pub fn classify_blocking(&self, source: &ImageSource) -> Result<PredictionResult> {
        self.decode_and_classify(source).map(|(_, prediction)| prediction)
    }

    /// Readiness is checked before decoding so an unloaded session fails fast.
    fn decode_and_classify(&self, source: &ImageSource) -> Result<(DynamicImage, PredictionResult)> {
        if !self.session.is_ready() {
            return Err(CaneScanError::NotReady);
        }
        let image = source.decode()?;
        let prediction = self.classify_image(&image)?;
        Ok((image, prediction))
    }

    pub fn classify_image(&self, image: &DynamicImage) -> Result<PredictionResult> {
        let tensor = preprocess(image)?;
        let raw = invoker::run(&self.session, &tensor)?;
        let result = postprocess(&raw, self.session.catalog())?;

        info!(
            "Classified {}x{} image as {} ({}%) in {:.1} ms",
            image.width(),
            image.height(),
            result.label,
            result.confidence_percent,
            result.inference_ms
        );
        Ok(result)
    }
}
