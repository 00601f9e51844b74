use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{Action, Direction, GameConfig, GameEngine, GameSession};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Keyboard-steered game: the four directional keys drive the snake directly.
pub struct HumanMode {
    engine: GameEngine,
    session: GameSession,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    pending_direction: Option<Direction>,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let session = engine.new_session();

        Self {
            engine,
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_direction: None,
        }
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

        let mut tick_timer = interval(self.engine.config().tick_interval());

        // Rendering runs at 30 FPS, independent of the game tick
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    self.update_game();
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.session, &self.metrics, None);
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

        let action = self
            .pending_direction
            .take()
            .map(Action::Move)
            .unwrap_or(Action::Continue);

        let result = self.engine.tick(&mut self.session, action);

        if result.game_over() {
            self.metrics.on_game_over(self.session.score);
        }
    }

    fn reset_game(&mut self) {
        self.session = self.engine.new_session();
        self.metrics.on_game_start();
        self.pending_direction = None;
    }
}

/// Restore the terminal; shared by the interactive modes.
pub(crate) fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GamePhase;

    #[test]
    fn test_initial_session() {
        let mode = HumanMode::new(GameConfig::default());
        assert!(mode.session.is_running());
        assert_eq!(mode.session.score, 0);
    }

    #[test]
    fn test_reset_creates_fresh_session() {
        let mut mode = HumanMode::new(GameConfig::default());
        mode.session.score = 12;
        mode.session.phase = GamePhase::Over;
        mode.pending_direction = Some(Direction::Up);

        mode.reset_game();

        assert_eq!(mode.session.score, 0);
        assert!(mode.session.is_running());
        assert_eq!(mode.pending_direction, None);
    }

    #[test]
    fn test_tick_is_frozen_after_game_over() {
        let mut mode = HumanMode::new(GameConfig::default());
        mode.session.phase = GamePhase::Over;
        let ticks = mode.session.ticks;

        mode.update_game();

        assert_eq!(mode.session.ticks, ticks);
    }
}
