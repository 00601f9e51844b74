//! Classifier pipeline: frames in, a position label out.
//!
//! Frames from a [`FrameSource`] are mirrored, reduced to descriptors by a
//! [`FeatureExtractor`], classified by the [`KnnClassifier`] against a
//! pretrained [`KnnSnapshot`], and the outcome lands in the
//! [`ClassifierBridge`] which keeps the single label the game consumes.
//! [`ReadinessPipeline`] tracks startup of the external pieces.

pub mod backend;
pub mod bridge;
pub mod extractor;
pub mod frame;
pub mod knn;
pub mod pipeline;
pub mod result;
pub mod snapshot;

pub use backend::{default_device, InferenceBackend};
pub use bridge::ClassifierBridge;
pub use extractor::{FeatureExtractor, PoolingExtractor};
pub use frame::{image_files, mirror, DirectoryFrameSource, FrameSource};
pub use knn::KnnClassifier;
pub use pipeline::{PipelineStage, ReadinessPipeline};
pub use result::Classification;
pub use snapshot::{load_snapshot, save_snapshot, KnnSnapshot, LabeledExample};
