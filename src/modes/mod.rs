//! Execution modes, each owning its own event loop.

pub mod enroll;
pub mod human;
pub mod pose;

pub use enroll::{EnrollConfig, EnrollMode};
pub use human::HumanMode;
pub use pose::PoseMode;
