use anyhow::{anyhow, ensure, Context, Result};
use burn::tensor::{backend::Backend, Tensor, TensorData};
use std::cmp::Ordering;

use super::result::Classification;
use super::snapshot::KnnSnapshot;

/// Nearest-neighbor classifier over image feature descriptors.
///
/// Labeled descriptors are stacked into an `[N, feature_len]` example matrix;
/// classification computes squared euclidean distances to a query on the
/// tensor backend and lets the k nearest examples vote. Confidence per label
/// is votes/k, reported for every registered label in registration order so
/// that argmax tie-breaking is deterministic.
pub struct KnnClassifier<B: Backend> {
    k: usize,
    feature_len: usize,
    /// Labels in registration order; indices key `example_labels`
    labels: Vec<String>,
    /// Label index of each example row
    example_labels: Vec<usize>,
    /// Example matrix, `[num_examples, feature_len]`
    examples: Option<Tensor<B, 2>>,
    device: B::Device,
}

impl<B: Backend> KnnClassifier<B> {
    pub fn new(k: usize, feature_len: usize, device: B::Device) -> Result<Self> {
        ensure!(k >= 1, "k must be at least 1");
        ensure!(feature_len >= 1, "descriptors must have at least one feature");

        Ok(Self {
            k,
            feature_len,
            labels: Vec::new(),
            example_labels: Vec::new(),
            examples: None,
            device,
        })
    }

    /// Rebuild a classifier from a saved snapshot
    pub fn from_snapshot(snapshot: &KnnSnapshot, device: B::Device) -> Result<Self> {
        snapshot.validate()?;

        let mut classifier = Self::new(snapshot.k, snapshot.feature_len, device)?;
        for example in &snapshot.examples {
            classifier.add_example(&example.label, example.features.clone())?;
        }
        Ok(classifier)
    }

    /// Register one labeled descriptor. First use of a label fixes its place
    /// in the registration order.
    pub fn add_example(&mut self, label: &str, features: Vec<f32>) -> Result<()> {
        ensure!(
            features.len() == self.feature_len,
            "descriptor has {} features, classifier expects {}",
            features.len(),
            self.feature_len
        );

        let label_idx = match self.labels.iter().position(|known| known == label) {
            Some(idx) => idx,
            None => {
                self.labels.push(label.to_string());
                self.labels.len() - 1
            }
        };
        self.example_labels.push(label_idx);

        let row = Tensor::<B, 2>::from_data(
            TensorData::new(features, [1, self.feature_len]),
            &self.device,
        );
        self.examples = Some(match self.examples.take() {
            Some(matrix) => Tensor::cat(vec![matrix, row], 0),
            None => row,
        });

        Ok(())
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    pub fn num_examples(&self) -> usize {
        self.example_labels.len()
    }

    pub fn feature_len(&self) -> usize {
        self.feature_len
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Classify one descriptor against the example set.
    ///
    /// k is capped at the number of stored examples. Classifying with an
    /// empty example set is an error, routed through the bridge's error path
    /// by callers.
    pub fn classify(&self, features: &[f32]) -> Result<Classification> {
        let examples = self
            .examples
            .as_ref()
            .context("classifier has no examples registered")?;
        ensure!(
            features.len() == self.feature_len,
            "descriptor has {} features, classifier expects {}",
            features.len(),
            self.feature_len
        );

        let query = Tensor::<B, 2>::from_data(
            TensorData::new(features.to_vec(), [1, self.feature_len]),
            &self.device,
        );

        // Squared euclidean distance per example row; the query broadcasts
        // across the example matrix.
        let diff = examples.clone().sub(query);
        let distances = diff.clone().mul(diff).sum_dim(1);
        let distances: Vec<f32> = distances
            .to_data()
            .to_vec()
            .map_err(|e| anyhow!("failed to read distance tensor: {e:?}"))?;

        let mut order: Vec<usize> = (0..distances.len()).collect();
        order.sort_by(|&a, &b| {
            distances[a]
                .partial_cmp(&distances[b])
                .unwrap_or(Ordering::Equal)
        });

        let k = self.k.min(distances.len());
        let mut votes = vec![0usize; self.labels.len()];
        for &example_idx in order.iter().take(k) {
            votes[self.example_labels[example_idx]] += 1;
        }

        Ok(self
            .labels
            .iter()
            .zip(votes)
            .map(|(label, count)| (label.clone(), count as f32 / k as f32))
            .collect())
    }
}
