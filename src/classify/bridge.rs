use anyhow::Result;

use super::result::Classification;
use crate::game::Direction;

/// Receives asynchronous classification outcomes and distills them into one
/// current label.
///
/// Results arrive whenever an inference task completes, interleaved between
/// game ticks; the bridge only ever reflects the latest successful one. An
/// error leaves the previous label in effect and is recorded for the status
/// line. A result landing after a game reset is consumed normally; at worst
/// it steers the first tick of the fresh session, which the concurrency model
/// accepts.
#[derive(Debug, Default)]
pub struct ClassifierBridge {
    label: Option<String>,
    results: u64,
    errors: u64,
    last_error: Option<String>,
}

impl ClassifierBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one classification outcome
    pub fn on_classified(&mut self, outcome: Result<Classification>) {
        match outcome {
            Ok(result) => {
                self.results += 1;
                if let Some(label) = result.top_label() {
                    self.label = Some(label.to_string());
                }
            }
            Err(error) => {
                self.errors += 1;
                self.last_error = Some(format!("{error:#}"));
            }
        }
    }

    /// The latest classified label, if any classification has succeeded yet
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The latest label read as a steering direction.
    ///
    /// Labels that are not one of the four headings produce no hint; they
    /// still show up in the label display.
    pub fn direction_hint(&self) -> Option<Direction> {
        self.label.as_deref().and_then(Direction::from_label)
    }

    pub fn results(&self) -> u64 {
        self.results
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
