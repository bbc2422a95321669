use planetoid_config::ConfigError;
use planetoid_render::{RenderContextError, ShaderError};
use planetoid_scene::UniformError;

/// Errors that end the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    Render(#[from] RenderContextError),
}

/// Errors while building the scene's GPU resources. These close the
/// readiness gate but leave the session running.
#[derive(Debug, thiserror::Error)]
pub enum SceneBuildError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Uniform(#[from] UniformError),

    /// The GPU rejected a shader module or pipeline.
    #[error("shader compilation failed: {0}")]
    Compile(String),
}
