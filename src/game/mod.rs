//! Core game logic: grid model, snake state machine, food placement and the
//! per-tick engine. No I/O or rendering dependencies; the modes drive this
//! programmatically.

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;
pub mod session;

pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, TickResult};
pub use grid::Grid;
pub use session::{CollisionKind, GamePhase, GameSession, Position, Snake};
