//! Error types for SmsGuard

/// Result type alias using SmsGuard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for SmsGuard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Artifact provisioning errors (download, cache)
    #[error("provisioning error: {0}")]
    Provision(String),

    /// Model loading and inference errors
    #[error("model error: {0}")]
    Model(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new provisioning error
    pub fn provision(msg: impl Into<String>) -> Self {
        Self::Provision(msg.into())
    }

    /// Create a new model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }
}
