use super::{
    action::{Action, Direction},
    config::GameConfig,
    grid::Grid,
    session::{CollisionKind, GamePhase, GameSession, Position, Snake},
};
use rand::Rng;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickResult {
    /// The snake ate food this tick (and grew by one)
    pub ate_food: bool,
    /// Set when this tick ended the game
    pub collision: Option<CollisionKind>,
}

impl TickResult {
    pub fn game_over(&self) -> bool {
        self.collision.is_some()
    }
}

/// Drives the simulation: session creation, the per-tick state transition,
/// and food placement.
pub struct GameEngine {
    config: GameConfig,
    rng: rand::rngs::ThreadRng,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: rand::rng(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Create a fresh session: a snake at the grid center heading Right,
    /// food placed, score zero.
    pub fn new_session(&mut self) -> GameSession {
        let grid = self.config.grid();
        let snake = Snake::new(grid.center(), Direction::Right, self.config.initial_snake_length);
        let food = self.spawn_food(grid);

        GameSession::new(snake, food, grid)
    }

    /// Advance the session by one tick.
    ///
    /// Order per tick: apply the directional input, check the eat condition
    /// against the next head cell, commit the move (growing on an eat), then
    /// check for wall or self collision at the new head. A session that is
    /// already over is left untouched.
    pub fn tick(&mut self, session: &mut GameSession, action: Action) -> TickResult {
        if !session.is_running() {
            return TickResult::default();
        }

        if let Action::Move(direction) = action {
            session.snake.set_direction(direction);
        }

        // Eat is decided against the head cell of the upcoming move, before
        // the move is committed.
        let ate_food = session.snake.next_head() == session.food;

        session.snake.advance(ate_food);
        session.ticks += 1;

        if ate_food {
            session.score += 1;
            session.food = self.spawn_food(session.grid);
        }

        let collision = end_check(session);
        if collision.is_some() {
            session.phase = GamePhase::Over;
        }

        TickResult { ate_food, collision }
    }

    /// Place food uniformly at random on the grid.
    ///
    /// No exclusion against the snake body; an overlapping spawn is eaten in
    /// passing when the head next enters the cell.
    fn spawn_food(&mut self, grid: Grid) -> Position {
        let x = self.rng.random_range(0..grid.width);
        let y = self.rng.random_range(0..grid.height);
        Position::new(x, y)
    }
}

/// The game ends when the head has left the playfield or coincides with a
/// non-head body segment. Evaluated after the move has been committed.
fn end_check(session: &GameSession) -> Option<CollisionKind> {
    let head = session.snake.head();

    if !session.grid.contains(head) {
        return Some(CollisionKind::Wall);
    }

    if session.snake.collides_with_body(head) {
        return Some(CollisionKind::SelfCollision);
    }

    None
}
