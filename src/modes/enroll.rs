//! Snapshot building: turn directories of labeled frames into the pretrained
//! classifier artifact pose mode loads.
//!
//! Layout convention: every subdirectory of the frames root names a label,
//! and every image inside it becomes one example for that label.

use anyhow::{ensure, Context, Result};
use std::path::{Path, PathBuf};

use crate::classify::{image_files, mirror, save_snapshot, FeatureExtractor, KnnSnapshot, PoolingExtractor};

/// Configuration for an enroll run
#[derive(Debug, Clone)]
pub struct EnrollConfig {
    /// Root directory; each subdirectory is one label
    pub frames_root: PathBuf,
    /// Where to write the snapshot
    pub model_path: PathBuf,
    /// Neighbors consulted per classification when the snapshot is used
    pub k: usize,
}

pub struct EnrollMode {
    config: EnrollConfig,
    extractor: PoolingExtractor,
}

impl EnrollMode {
    pub fn new(config: EnrollConfig) -> Self {
        Self {
            config,
            extractor: PoolingExtractor::default(),
        }
    }

    /// Build and write the snapshot. Returns the number of examples enrolled.
    pub fn run(&self) -> Result<usize> {
        let snapshot = self.build_snapshot()?;
        let enrolled = snapshot.examples.len();

        save_snapshot(&snapshot, &self.config.model_path)?;
        println!(
            "Enrolled {} examples across {} labels into {}",
            enrolled,
            snapshot.labels().len(),
            self.config.model_path.display()
        );

        Ok(enrolled)
    }

    fn build_snapshot(&self) -> Result<KnnSnapshot> {
        let mut snapshot = KnnSnapshot::new(self.config.k, self.extractor.feature_len());

        for label_dir in self.label_dirs()? {
            let label = label_dir
                .file_name()
                .and_then(|name| name.to_str())
                .with_context(|| format!("unusable label directory name {}", label_dir.display()))?
                .to_string();

            for path in image_files(&label_dir)? {
                let frame = image::open(&path)
                    .with_context(|| format!("failed to load frame {}", path.display()))?
                    .to_luma8();

                // Same mirroring as the live pipeline, so enrolled
                // descriptors and inference descriptors line up
                let features = self.extractor.extract(&mirror(&frame));
                snapshot.push(&label, features)?;
            }
        }

        ensure!(
            !snapshot.examples.is_empty(),
            "no labeled frames found under {}",
            self.config.frames_root.display()
        );

        Ok(snapshot)
    }

    fn label_dirs(&self) -> Result<Vec<PathBuf>> {
        let root: &Path = &self.config.frames_root;
        let entries = std::fs::read_dir(root)
            .with_context(|| format!("failed to read frames root {}", root.display()))?;

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();

        Ok(dirs)
    }
}
