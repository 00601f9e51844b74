use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{GameSession, Position};
use crate::metrics::GameMetrics;

/// Classifier-side state the HUD shows alongside the game
#[derive(Debug, Clone, Default)]
pub struct ClassifierStatus {
    /// Whether the readiness pipeline has completed
    pub ready: bool,
    /// Current pipeline stage description, shown while not ready
    pub stage: &'static str,
    /// Latest classified position label
    pub label: Option<String>,
    /// Classification errors so far
    pub errors: u64,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw one frame: score header, playfield (or game-over panel), and the
    /// controls/status footer.
    pub fn render(
        &self,
        frame: &mut Frame,
        session: &GameSession,
        metrics: &GameMetrics,
        classifier: Option<&ClassifierStatus>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Score header
                Constraint::Min(0),    // Playfield
                Constraint::Length(3), // Status + controls
            ])
            .split(frame.area());

        frame.render_widget(self.score_line(session, metrics), chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if session.is_running() {
            frame.render_widget(self.playfield(session), game_area);
        } else {
            frame.render_widget(self.game_over_panel(session), game_area);
        }

        frame.render_widget(self.footer(classifier), chunks[2]);
    }

    fn score_line(&self, session: &GameSession, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                session.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn playfield(&self, session: &GameSession) -> Paragraph<'_> {
        let mut lines = Vec::new();

        for y in 0..session.grid.height {
            let mut spans = Vec::new();

            for x in 0..session.grid.width {
                let pos = Position::new(x, y);

                let cell = if pos == session.snake.head() {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if session.snake.collides_with_body(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == session.food {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .title(" pose_snake "),
            )
            .alignment(Alignment::Center)
    }

    fn game_over_panel(&self, session: &GameSession) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "YOU LOSE.",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    session.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to reset or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn footer(&self, classifier: Option<&ClassifierStatus>) -> Paragraph<'_> {
        let mut lines = Vec::new();

        if let Some(status) = classifier {
            lines.push(self.position_line(status));
        }

        lines.push(Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to steer | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to reset | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]));

        Paragraph::new(lines).alignment(Alignment::Center)
    }

    fn position_line(&self, status: &ClassifierStatus) -> Line<'_> {
        if !status.ready {
            return Line::from(Span::styled(
                format!("Model loading, please wait... ({})", status.stage),
                Style::default().fg(Color::Yellow),
            ));
        }

        let mut spans = vec![Span::styled("Your Position: ", Style::default().fg(Color::Yellow))];
        match &status.label {
            Some(label) => spans.push(Span::styled(
                label.clone(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
            None => spans.push(Span::styled("?", Style::default().fg(Color::DarkGray))),
        }

        if status.errors > 0 {
            spans.push(Span::styled(
                format!("    ({} classification errors)", status.errors),
                Style::default().fg(Color::Red),
            ));
        }

        Line::from(spans)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
