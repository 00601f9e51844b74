//! Classifier-steered game.
//!
//! Loads a pretrained KNN snapshot, then runs the game loop with a
//! fire-and-forget inference round per tick: grab a frame, mirror it, extract
//! a descriptor and classify it on a spawned task whose outcome comes back
//! over a channel. The bridge's latest label steers the snake; the keyboard
//! still wins on any tick where both are present.

use anyhow::{ensure, Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{enable_raw_mode, EnterAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use super::human::cleanup_terminal;
use crate::classify::{
    default_device, load_snapshot, mirror, Classification, ClassifierBridge,
    DirectoryFrameSource, FeatureExtractor, FrameSource, InferenceBackend, KnnClassifier,
    PipelineStage, PoolingExtractor, ReadinessPipeline,
};
use crate::game::{Action, Direction, GameConfig, GameEngine, GameSession};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{ClassifierStatus, Renderer};

pub struct PoseMode {
    engine: GameEngine,
    session: GameSession,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,

    pipeline: ReadinessPipeline,
    frames: Box<dyn FrameSource>,
    extractor: Arc<dyn FeatureExtractor>,
    classifier: Arc<KnnClassifier<InferenceBackend>>,
    bridge: ClassifierBridge,
    inference_in_flight: bool,

    should_quit: bool,
    pending_direction: Option<Direction>,
}

impl PoseMode {
    /// Bring up the whole pipeline: frame source, extractor, classifier,
    /// snapshot. Each completion advances the readiness machine; any failure
    /// is fatal here rather than leaving the game running label-less forever.
    pub fn new(config: GameConfig, model_path: &Path, frames_dir: &Path) -> Result<Self> {
        let mut pipeline = ReadinessPipeline::new();

        let frames = DirectoryFrameSource::open(frames_dir)
            .context("failed to open the video frame source")?;
        pipeline.advance(PipelineStage::VideoReady)?;

        let extractor: Arc<dyn FeatureExtractor> = Arc::new(PoolingExtractor::default());
        pipeline.advance(PipelineStage::ExtractorReady)?;

        let snapshot = load_snapshot(model_path)
            .with_context(|| format!("failed to load classifier snapshot {}", model_path.display()))?;
        let mut classifier =
            KnnClassifier::<InferenceBackend>::new(snapshot.k, snapshot.feature_len, default_device())?;
        pipeline.advance(PipelineStage::ClassifierReady)?;

        ensure!(
            classifier.feature_len() == extractor.feature_len(),
            "snapshot descriptors have {} features but the extractor produces {}",
            classifier.feature_len(),
            extractor.feature_len()
        );
        for example in &snapshot.examples {
            classifier.add_example(&example.label, example.features.clone())?;
        }
        pipeline.advance(PipelineStage::ModelLoaded)?;

        println!("Loaded classifier snapshot {}", model_path.display());
        println!(
            "  {} examples, {} labels ({}), k = {}",
            classifier.num_examples(),
            classifier.num_labels(),
            classifier.labels().join(", "),
            snapshot.k,
        );

        let mut engine = GameEngine::new(config);
        let session = engine.new_session();

        Ok(Self {
            engine,
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            pipeline,
            frames: Box::new(frames),
            extractor,
            classifier: Arc::new(classifier),
            bridge: ClassifierBridge::new(),
            inference_in_flight: false,
            should_quit: false,
            pending_direction: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor().context("failed to hide cursor")?;
        terminal.clear().context("failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Inference completions land here, interleaved between ticks
        let (result_tx, mut result_rx) = mpsc::channel::<Result<Classification>>(8);

        let mut tick_timer = interval(self.engine.config().tick_interval());
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    self.maybe_start_inference(&result_tx);
                    self.update_game();
                }

                Some(outcome) = result_rx.recv() => {
                    self.inference_in_flight = false;
                    self.bridge.on_classified(outcome);
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let status = self.classifier_status();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.session, &self.metrics, Some(&status));
                    }).context("failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Kick off one inference round, if the pipeline allows it.
    ///
    /// Gated on readiness, at least one registered label, and no round
    /// already in flight; a slow classification therefore yields a stale
    /// label on this tick instead of a delayed tick.
    fn maybe_start_inference(&mut self, result_tx: &mpsc::Sender<Result<Classification>>) {
        if self.inference_in_flight
            || !self.pipeline.is_ready()
            || self.classifier.num_labels() == 0
        {
            return;
        }

        let frame = match self.frames.next_frame() {
            Ok(frame) => frame,
            Err(error) => {
                // Frame grab failures take the classification error path
                self.bridge.on_classified(Err(error));
                return;
            }
        };

        let extractor = Arc::clone(&self.extractor);
        let classifier = Arc::clone(&self.classifier);
        let result_tx = result_tx.clone();
        self.inference_in_flight = true;

        tokio::spawn(async move {
            let features = extractor.extract(&mirror(&frame));
            let outcome = classifier.classify(&features);
            let _ = result_tx.send(outcome).await;
        });
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Game(Action::Move(direction)) => {
                    self.pending_direction = Some(direction);
                }
                KeyAction::Game(Action::Continue) => {}
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn update_game(&mut self) {
        if !self.session.is_running() {
            return;
        }

        // Keyboard first, then the classifier's latest label
        let action = self
            .pending_direction
            .take()
            .or_else(|| self.bridge.direction_hint())
            .map(Action::Move)
            .unwrap_or(Action::Continue);

        let result = self.engine.tick(&mut self.session, action);

        if result.game_over() {
            self.metrics.on_game_over(self.session.score);
        }
    }

    fn reset_game(&mut self) {
        // An inference still in flight will land in the fresh session's
        // bridge; that late label is benign.
        self.session = self.engine.new_session();
        self.metrics.on_game_start();
        self.pending_direction = None;
    }

    fn classifier_status(&self) -> ClassifierStatus {
        ClassifierStatus {
            ready: self.pipeline.is_ready(),
            stage: self.pipeline.stage().describe(),
            label: self.bridge.label().map(String::from),
            errors: self.bridge.errors(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{save_snapshot, KnnSnapshot};
    use image::{GrayImage, Luma};
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir, feature_len: usize) -> (std::path::PathBuf, std::path::PathBuf) {
        let frames_dir = dir.path().join("frames");
        std::fs::create_dir_all(&frames_dir).unwrap();
        GrayImage::from_pixel(16, 12, Luma([128]))
            .save(frames_dir.join("frame0.png"))
            .unwrap();

        let model_path = dir.path().join("model").join("knn.json");
        let mut snapshot = KnnSnapshot::new(3, feature_len);
        snapshot.push("left", vec![0.0; feature_len]).unwrap();
        snapshot.push("right", vec![1.0; feature_len]).unwrap();
        save_snapshot(&snapshot, &model_path).unwrap();

        (model_path, frames_dir)
    }

    #[test]
    fn test_pipeline_comes_up_ready() {
        let dir = TempDir::new().unwrap();
        // PoolingExtractor::default() produces 192 features
        let (model_path, frames_dir) = write_fixture(&dir, 192);

        let mode = PoseMode::new(GameConfig::default(), &model_path, &frames_dir).unwrap();

        assert!(mode.pipeline.is_ready());
        assert_eq!(mode.classifier.num_labels(), 2);
        assert!(!mode.inference_in_flight);
        assert!(mode.session.is_running());
    }

    #[test]
    fn test_descriptor_length_mismatch_is_fatal() {
        let dir = TempDir::new().unwrap();
        let (model_path, frames_dir) = write_fixture(&dir, 2);

        assert!(PoseMode::new(GameConfig::default(), &model_path, &frames_dir).is_err());
    }

    #[test]
    fn test_missing_snapshot_is_fatal() {
        let dir = TempDir::new().unwrap();
        let (_, frames_dir) = write_fixture(&dir, 192);

        let absent = dir.path().join("nope.json");
        assert!(PoseMode::new(GameConfig::default(), &absent, &frames_dir).is_err());
    }

    #[test]
    fn test_bridge_label_steers_the_snake() {
        let dir = TempDir::new().unwrap();
        let (model_path, frames_dir) = write_fixture(&dir, 192);
        let mut mode = PoseMode::new(GameConfig::default(), &model_path, &frames_dir).unwrap();

        // Snake starts heading Right; a classified "up" should turn it
        mode.bridge
            .on_classified(Ok([("up".to_string(), 1.0)].into_iter().collect()));
        mode.update_game();

        assert_eq!(mode.session.snake.direction, Direction::Up);
    }

    #[test]
    fn test_keyboard_wins_over_bridge_label() {
        let dir = TempDir::new().unwrap();
        let (model_path, frames_dir) = write_fixture(&dir, 192);
        let mut mode = PoseMode::new(GameConfig::default(), &model_path, &frames_dir).unwrap();

        mode.bridge
            .on_classified(Ok([("up".to_string(), 1.0)].into_iter().collect()));
        mode.pending_direction = Some(Direction::Down);
        mode.update_game();

        assert_eq!(mode.session.snake.direction, Direction::Down);
        // The pending key was consumed; the label keeps steering next tick
        assert_eq!(mode.pending_direction, None);
    }
}
