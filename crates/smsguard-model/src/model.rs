//! Serialized decision-tree model: loading, validation, and inference

use serde::{Deserialize, Serialize};
use smsguard_core::{Error, Label, Result};
use std::path::Path;

/// A trained spam classification model deserialized from disk.
///
/// The artifact is a JSON document carrying the classifier identifier, the
/// vocabulary the feature extractor was fitted with, and the decision tree
/// itself. Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamModel {
    /// Human-readable classifier identifier, echoed in API responses
    pub classifier: String,

    /// Ordered vocabulary; term counts occupy the first `vocabulary.len()`
    /// feature slots, the message length occupies the last one
    pub vocabulary: Vec<String>,

    /// Root of the decision tree
    pub tree: TreeNode,
}

/// A node of the decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal node: route left when `features[feature] <= threshold`
    Split {
        feature: usize,
        threshold: f32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    /// Terminal node carrying the predicted label
    Leaf { label: Label },
}

impl TreeNode {
    fn check_features(&self, feature_len: usize) -> Result<()> {
        match self {
            Self::Split {
                feature,
                left,
                right,
                ..
            } => {
                if *feature >= feature_len {
                    return Err(Error::model(format!(
                        "tree references feature {feature} but the model has only {feature_len} features"
                    )));
                }
                left.check_features(feature_len)?;
                right.check_features(feature_len)
            }
            Self::Leaf { .. } => Ok(()),
        }
    }
}

impl SpamModel {
    /// Load and validate a model artifact from disk.
    ///
    /// Invoked once at startup, after provisioning. A missing, unreadable, or
    /// structurally invalid artifact is fatal: there is no retry, the operator
    /// deletes the cached file or fixes the remote source.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|e| {
            Error::model(format!(
                "failed to read model artifact {}: {e}",
                path.display()
            ))
        })?;

        let model: SpamModel = serde_json::from_slice(&bytes).map_err(|e| {
            Error::model(format!(
                "failed to deserialize model artifact {}: {e}",
                path.display()
            ))
        })?;

        model.validate()?;
        Ok(model)
    }

    /// Number of features the model expects: one slot per vocabulary term
    /// plus the message-length slot.
    pub fn feature_len(&self) -> usize {
        self.vocabulary.len() + 1
    }

    fn validate(&self) -> Result<()> {
        if self.vocabulary.is_empty() {
            return Err(Error::model("model vocabulary is empty"));
        }
        self.tree.check_features(self.feature_len())
    }

    /// Walk the tree and return the predicted label.
    ///
    /// Pure and lock-free; safe to call from concurrent requests. Features
    /// past the end of the slice read as zero (`load` validates indices, so
    /// this only matters for callers constructing vectors by hand).
    pub fn predict(&self, features: &[f32]) -> Label {
        let mut node = &self.tree;
        loop {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    node = if value <= *threshold { left } else { right };
                }
                TreeNode::Leaf { label } => return *label,
            }
        }
    }
}
