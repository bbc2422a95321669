//! Configuration for Planetoid.
//!
//! Settings persist to disk as a RON file in the platform config directory.
//! Command-line flags parsed with clap override whatever the file says, and
//! every struct defaults field-by-field so older files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, ShaderConfig, WindowConfig, WorldConfig, default_config_dir,
    default_log_dir,
};
pub use error::ConfigError;
