//! Shared application state

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use smsguard_model::{ensure_present, SpamClassifier, SpamModel};
use std::sync::Arc;
use tracing::info;

use crate::config::ServiceConfig;

/// Application state shared across all requests
///
/// Constructed exactly once at startup, after provisioning and model load
/// succeed. Every field is immutable from then on; concurrent requests share
/// the classifier without locking.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServiceConfig>,

    /// The loaded spam classifier
    pub classifier: Arc<SpamClassifier>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Initialize application state from configuration
    ///
    /// Provisions the model artifact (downloading on cache miss) and
    /// deserializes it into memory. Any failure is fatal: the caller must
    /// abort before binding the server socket.
    pub async fn new(config: ServiceConfig, metrics_handle: PrometheusHandle) -> Result<Self> {
        info!("Initializing application state");

        let path = ensure_present(&config.artifact_spec()).await?;
        info!(path = %path.display(), "Model artifact resolved");

        let model = SpamModel::load(&path)?;
        let classifier = SpamClassifier::new(model)?;
        info!(classifier = classifier.name(), "Model loaded");

        Ok(Self {
            config: Arc::new(config),
            classifier: Arc::new(classifier),
            metrics_handle,
        })
    }
}
