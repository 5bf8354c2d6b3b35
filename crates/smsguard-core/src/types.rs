//! Core domain types for SmsGuard

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification label for an SMS message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Unsolicited/junk message
    Spam,
    /// Legitimate message
    Ham,
}

impl Label {
    /// Get the wire representation of the label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spam => "spam",
            Self::Ham => "ham",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a single message
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Predicted label
    pub label: Label,

    /// Human-readable identifier of the classifier that produced it
    pub classifier: String,

    /// Inference latency in microseconds
    pub latency_us: u64,
}
