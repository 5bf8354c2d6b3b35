//! Artifact provisioning: guarantee the model file exists locally
//!
//! Runs exactly once at startup, strictly before the server socket is bound.
//! A file already present in the cache directory is used as-is with no network
//! access; otherwise the artifact is fetched from the configured URL, probed,
//! and written into the cache for subsequent restarts.

use crate::model::SpamModel;
use smsguard_core::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tracing::info;

/// Name of the configuration setting holding the remote artifact URL
pub const MODEL_URL_VAR: &str = "MODEL_URL";

/// Bound on the one-time artifact fetch
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a model artifact lives and where it may be fetched from
#[derive(Debug, Clone)]
pub struct ArtifactSpec {
    /// Artifact filename; stable across restarts, doubles as the cache key
    pub filename: String,

    /// Local cache directory
    pub dir: PathBuf,

    /// Remote source; only consulted on cache miss
    pub url: Option<String>,
}

impl ArtifactSpec {
    /// Create a spec with no remote source
    pub fn new(dir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            dir: dir.into(),
            url: None,
        }
    }

    /// Set the remote source URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Full local path of the artifact
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }
}

/// Ensure the artifact exists locally, downloading it if necessary.
///
/// Cache hit: the existing path is returned immediately, with no network
/// access and no content re-validation. Cache miss: the remote source must be
/// configured, and exactly one fetch is performed with [`DOWNLOAD_TIMEOUT`].
/// The downloaded bytes are fully buffered, written to the cache, then probed
/// with the same deserialization routine used at load time; a failed probe
/// removes the file again so a bad download never poisons the cache.
///
/// Every failure here is fatal to startup: the process must not begin serving
/// without a usable artifact.
pub async fn ensure_present(spec: &ArtifactSpec) -> Result<PathBuf> {
    let path = spec.path();

    if path.exists() {
        info!(path = %path.display(), "using existing model artifact");
        return Ok(path);
    }

    let url = spec.url.as_deref().ok_or_else(|| {
        Error::config(format!(
            "{MODEL_URL_VAR} is not set and model file {} does not exist; \
             either mount a volume with the model or configure a download URL",
            path.display()
        ))
    })?;

    info!(%url, "downloading model artifact");

    let client = reqwest::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(|e| Error::provision(format!("failed to build download client: {e}")))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Error::Timeout
        } else {
            Error::provision(format!("failed to fetch model artifact from {url}: {e}"))
        }
    })?;

    if !response.status().is_success() {
        return Err(Error::provision(format!(
            "model download from {url} failed with status {}",
            response.status()
        )));
    }

    let bytes = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            Error::Timeout
        } else {
            Error::provision(format!("failed to read model artifact body: {e}"))
        }
    })?;

    fs::create_dir_all(&spec.dir).await?;
    fs::write(&path, &bytes).await?;

    // Probe with the load-time deserializer; a bad artifact must not stay cached.
    if let Err(e) = SpamModel::load(&path) {
        let _ = fs::remove_file(&path).await;
        return Err(Error::provision(format!(
            "downloaded artifact is not a valid model: {e}"
        )));
    }

    info!(path = %path.display(), bytes = bytes.len(), "model download complete");
    Ok(path)
}
