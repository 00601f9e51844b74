use super::action::Direction;
use super::grid::Grid;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The player character: an ordered run of cells, head first
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, head at index 0; insertion order is body order
    pub body: Vec<Position>,
    /// Current heading
    pub direction: Direction,
}

impl Snake {
    /// Create a snake of the given length with its head at `head`, trailing
    /// away from the direction of travel.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let mut body = vec![head];

        for i in 1..length.max(1) {
            let prev = body[i - 1];
            body.push(prev.moved_by(-dx, -dy));
        }

        Self { body, direction }
    }

    /// Head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Body segments behind the head
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Whether the position coincides with a non-head segment
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// The cell the head will occupy on the next advance
    pub fn next_head(&self) -> Position {
        self.head().moved_in_direction(self.direction)
    }

    /// Request a turn. Accepted only when the new heading changes the axis of
    /// motion; a reversal or a same-axis re-set leaves the heading untouched.
    ///
    /// Returns whether the turn was accepted.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if self.direction.same_axis(new_direction) {
            return false;
        }
        self.direction = new_direction;
        true
    }

    /// Advance one cell in the current heading: the new head is inserted at
    /// the front and, unless `grow`, the tail cell is dropped to preserve
    /// length.
    pub fn advance(&mut self, grow: bool) {
        let new_head = self.next_head();
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Whether the game is accepting ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    /// Terminal until an explicit reset creates a fresh session
    Over,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// Head left the playfield
    Wall,
    /// Head ran into the body
    SelfCollision,
}

/// One complete game: snake, food, score and phase, owned as a unit.
///
/// Everything the loop and the input handlers touch is reached through this
/// struct; there is no free-standing game state anywhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub snake: Snake,
    pub food: Position,
    pub grid: Grid,
    pub score: u32,
    pub ticks: u32,
    pub phase: GamePhase,
}

impl GameSession {
    pub fn new(snake: Snake, food: Position, grid: Grid) -> Self {
        Self {
            snake,
            food,
            grid,
            score: 0,
            ticks: 0,
            phase: GamePhase::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Whether a position is occupied by any snake segment
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }
}
