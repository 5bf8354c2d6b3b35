//! Service configuration

use smsguard_model::ArtifactSpec;
use std::path::PathBuf;

/// Service configuration
///
/// Built once from the CLI/environment at startup and shared read-only
/// afterwards. Setting names mirror the deployment environment:
/// `MODEL_DIR`, `MODEL_FILE`, `MODEL_URL`, `MODEL_SERVICE_PORT`.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Local directory for cached model artifacts
    pub model_dir: PathBuf,

    /// Artifact filename within `model_dir`
    pub model_file: String,

    /// Remote source for the artifact; only required on cache miss
    pub model_url: Option<String>,

    /// Port the server listens on
    pub port: u16,
}

impl ServiceConfig {
    /// Build configuration from parsed CLI arguments
    pub fn from_cli(cli: &crate::Cli) -> Self {
        Self {
            model_dir: cli.model_dir.clone(),
            model_file: cli.model_file.clone(),
            model_url: cli.model_url.clone(),
            port: cli.port,
        }
    }

    /// Provisioning spec for the configured artifact
    pub fn artifact_spec(&self) -> ArtifactSpec {
        let spec = ArtifactSpec::new(&self.model_dir, &self.model_file);
        match &self.model_url {
            Some(url) => spec.with_url(url),
            None => spec,
        }
    }

    /// Expected local path of the artifact
    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_file)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("/models"),
            model_file: "model.joblib".to_string(),
            model_url: None,
            port: 8080,
        }
    }
}
