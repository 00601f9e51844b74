use anyhow::{ensure, Result};

/// Stages of classifier startup, in the order they complete.
///
/// Each external resource reports in when it is usable; the machine only
/// moves forward, one stage at a time. Inference is gated on the terminal
/// stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Nothing initialized yet
    Idle,
    /// The frame source is delivering frames
    VideoReady,
    /// The feature extractor is constructed
    ExtractorReady,
    /// The classifier is constructed (but may hold no examples yet)
    ClassifierReady,
    /// The pretrained snapshot has been loaded; inference may run
    ModelLoaded,
}

impl PipelineStage {
    /// Status text for the HUD while the pipeline is coming up
    pub fn describe(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "starting up",
            PipelineStage::VideoReady => "video ready, loading extractor",
            PipelineStage::ExtractorReady => "extractor ready, building classifier",
            PipelineStage::ClassifierReady => "classifier ready, loading model",
            PipelineStage::ModelLoaded => "model loaded",
        }
    }

    fn predecessor(&self) -> Option<PipelineStage> {
        match self {
            PipelineStage::Idle => None,
            PipelineStage::VideoReady => Some(PipelineStage::Idle),
            PipelineStage::ExtractorReady => Some(PipelineStage::VideoReady),
            PipelineStage::ClassifierReady => Some(PipelineStage::ExtractorReady),
            PipelineStage::ModelLoaded => Some(PipelineStage::ClassifierReady),
        }
    }
}

/// Linear readiness machine for the classifier pipeline.
///
/// Replaces a chain of completion callbacks flipping ad-hoc flags: the loop
/// asks one question (`is_ready`), and out-of-order completions are an error
/// instead of a silent inconsistency.
#[derive(Debug)]
pub struct ReadinessPipeline {
    stage: PipelineStage,
}

impl ReadinessPipeline {
    pub fn new() -> Self {
        Self {
            stage: PipelineStage::Idle,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Whether every stage has completed and inference may run
    pub fn is_ready(&self) -> bool {
        self.stage == PipelineStage::ModelLoaded
    }

    /// Record completion of the stage `to`. Only the immediate successor of
    /// the current stage is accepted.
    pub fn advance(&mut self, to: PipelineStage) -> Result<()> {
        ensure!(
            to.predecessor() == Some(self.stage),
            "pipeline cannot advance from {:?} to {:?}",
            self.stage,
            to
        );
        self.stage = to;
        Ok(())
    }
}

impl Default for ReadinessPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_order_accepted() {
        let mut pipeline = ReadinessPipeline::new();
        assert_eq!(pipeline.stage(), PipelineStage::Idle);
        assert!(!pipeline.is_ready());

        pipeline.advance(PipelineStage::VideoReady).unwrap();
        pipeline.advance(PipelineStage::ExtractorReady).unwrap();
        pipeline.advance(PipelineStage::ClassifierReady).unwrap();
        assert!(!pipeline.is_ready());

        pipeline.advance(PipelineStage::ModelLoaded).unwrap();
        assert!(pipeline.is_ready());
    }

    #[test]
    fn test_skipping_a_stage_is_error() {
        let mut pipeline = ReadinessPipeline::new();
        assert!(pipeline.advance(PipelineStage::ExtractorReady).is_err());
        assert!(pipeline.advance(PipelineStage::ModelLoaded).is_err());
        // Still at Idle, the failed advances changed nothing
        assert_eq!(pipeline.stage(), PipelineStage::Idle);
    }

    #[test]
    fn test_repeating_a_stage_is_error() {
        let mut pipeline = ReadinessPipeline::new();
        pipeline.advance(PipelineStage::VideoReady).unwrap();
        assert!(pipeline.advance(PipelineStage::VideoReady).is_err());
    }

    #[test]
    fn test_terminal_stage_cannot_advance() {
        let mut pipeline = ReadinessPipeline::new();
        pipeline.advance(PipelineStage::VideoReady).unwrap();
        pipeline.advance(PipelineStage::ExtractorReady).unwrap();
        pipeline.advance(PipelineStage::ClassifierReady).unwrap();
        pipeline.advance(PipelineStage::ModelLoaded).unwrap();

        assert!(pipeline.advance(PipelineStage::ModelLoaded).is_err());
        assert!(pipeline.is_ready());
    }
}
