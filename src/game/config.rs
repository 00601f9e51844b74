use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use super::grid::Grid;

/// Configuration for the game
///
/// The playfield is expressed the way the canvas is: pixel dimensions plus a
/// cell size in pixels. The discrete grid is derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Cell size in pixels; the grid is canvas dimensions over this
    pub resolution: u32,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Game ticks per second
    pub tick_hz: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 640,
            canvas_height: 480,
            resolution: 20,
            initial_snake_length: 1,
            tick_hz: 5,
        }
    }
}

impl GameConfig {
    /// The derived playfield
    pub fn grid(&self) -> Grid {
        Grid::from_canvas(self.canvas_width, self.canvas_height, self.resolution)
    }

    /// Tick period for the game loop timer
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(1000 / u64::from(self.tick_hz.max(1)))
    }

    /// Reject configurations the game cannot run on
    pub fn validate(&self) -> Result<()> {
        ensure!(self.resolution > 0, "resolution must be a positive integer");
        ensure!(self.tick_hz > 0, "tick rate must be at least 1 Hz");

        let grid = self.grid();
        ensure!(
            grid.width >= 2 && grid.height >= 2,
            "canvas {}x{} at resolution {} leaves no playable grid",
            self.canvas_width,
            self.canvas_height,
            self.resolution
        );
        ensure!(
            self.initial_snake_length >= 1,
            "the snake needs at least one segment"
        );
        ensure!(
            self.initial_snake_length <= (grid.width / 2) as usize,
            "initial snake length {} does not fit the grid",
            self.initial_snake_length
        );

        Ok(())
    }

    /// Small playfield used throughout the tests
    #[cfg(test)]
    pub fn small() -> Self {
        Self {
            canvas_width: 100,
            canvas_height: 100,
            resolution: 10,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());

        let grid = config.grid();
        assert_eq!(grid.width, 32);
        assert_eq!(grid.height, 24);
        assert_eq!(config.tick_interval(), std::time::Duration::from_millis(200));
    }

    #[test]
    fn test_invalid_resolution() {
        let config = GameConfig {
            resolution: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolution_larger_than_canvas() {
        let config = GameConfig {
            canvas_width: 30,
            canvas_height: 30,
            resolution: 20,
            ..Default::default()
        };
        // 1x1 grid is not playable
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_snake() {
        let config = GameConfig {
            initial_snake_length: 100,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
