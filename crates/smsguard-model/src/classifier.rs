//! Spam classifier: feature extraction wired to tree inference

use crate::features::FeatureExtractor;
use crate::model::SpamModel;
use smsguard_core::{Prediction, Result};
use std::time::Instant;

/// A loaded spam classifier.
///
/// Owns the immutable model and its matching feature extractor. Constructed
/// once at startup and shared across requests behind an `Arc`; `classify`
/// takes `&self` and never mutates state, so no locking is required.
pub struct SpamClassifier {
    name: String,
    model: SpamModel,
    extractor: FeatureExtractor,
}

impl SpamClassifier {
    /// Build a classifier from a loaded model.
    pub fn new(model: SpamModel) -> Result<Self> {
        let extractor = FeatureExtractor::new(&model.vocabulary)?;
        Ok(Self {
            name: model.classifier.clone(),
            model,
            extractor,
        })
    }

    /// Classify a raw message.
    pub fn classify(&self, text: &str) -> Result<Prediction> {
        let start = Instant::now();

        let features = self.extractor.prepare(text);
        let label = self.model.predict(&features);

        Ok(Prediction {
            label,
            classifier: self.name.clone(),
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    /// Get the classifier identifier
    pub fn name(&self) -> &str {
        &self.name
    }
}
