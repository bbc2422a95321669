//! Planetoid application: window, event handling and the frame loop.

pub mod error;
pub mod renderer;
pub mod window;

pub use error::{AppError, SceneBuildError};
pub use renderer::SceneRenderer;
pub use window::{AppState, run, window_attributes_from_config};
