pub mod renderer;

pub use renderer::{ClassifierStatus, Renderer};
