//! Persistence for the trained classifier.
//!
//! A snapshot is a single JSON artifact holding the labeled descriptors and
//! the classifier settings; pose mode loads one at startup, enroll mode
//! writes one.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One labeled descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledExample {
    pub label: String,
    pub features: Vec<f32>,
}

/// Serialized form of a trained KNN classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnSnapshot {
    /// Crate version that wrote the snapshot, for compatibility checking
    pub version: String,
    /// Number of neighbors consulted per classification
    pub k: usize,
    /// Length of every descriptor in `examples`
    pub feature_len: usize,
    pub examples: Vec<LabeledExample>,
}

impl KnnSnapshot {
    pub fn new(k: usize, feature_len: usize) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            k,
            feature_len,
            examples: Vec::new(),
        }
    }

    /// Append one labeled descriptor
    pub fn push(&mut self, label: &str, features: Vec<f32>) -> Result<()> {
        ensure!(
            features.len() == self.feature_len,
            "descriptor for label {:?} has {} features, snapshot expects {}",
            label,
            features.len(),
            self.feature_len
        );
        self.examples.push(LabeledExample {
            label: label.to_string(),
            features,
        });
        Ok(())
    }

    /// Distinct labels, in first-seen order
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for example in &self.examples {
            if !labels.contains(&example.label.as_str()) {
                labels.push(&example.label);
            }
        }
        labels
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.k >= 1, "snapshot k must be at least 1");
        ensure!(
            self.feature_len >= 1,
            "snapshot feature length must be at least 1"
        );
        for example in &self.examples {
            ensure!(
                example.features.len() == self.feature_len,
                "example for label {:?} has {} features, snapshot expects {}",
                example.label,
                example.features.len(),
                self.feature_len
            );
        }
        Ok(())
    }
}

/// Write a snapshot as pretty-printed JSON, creating parent directories
pub fn save_snapshot(snapshot: &KnnSnapshot, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(snapshot).context("failed to serialize snapshot")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write snapshot to {}", path.display()))?;

    Ok(())
}

/// Load and validate a snapshot.
///
/// A failure here is fatal to the classifier feature; callers surface it at
/// startup instead of running label-less forever.
pub fn load_snapshot(path: &Path) -> Result<KnnSnapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot from {}", path.display()))?;
    let snapshot: KnnSnapshot = serde_json::from_str(&json)
        .with_context(|| format!("snapshot {} is not valid JSON", path.display()))?;

    snapshot
        .validate()
        .with_context(|| format!("snapshot {} failed validation", path.display()))?;

    Ok(snapshot)
}
