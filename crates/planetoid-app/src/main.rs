//! Planetoid: a procedurally shaded planet with ocean, atmosphere and an
//! orbiting moon.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p planetoid-app -- --width 1920 --height 1080`.

use std::process::ExitCode;

use clap::Parser;
use planetoid_config::{CliArgs, Config, default_config_dir, default_log_dir};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().or_else(default_config_dir);
    let mut config = match &config_dir {
        Some(dir) => Config::load_or_create(dir).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}, using defaults");
            Config::default()
        }),
        None => Config::default(),
    };
    config.apply_cli_overrides(&args);

    let log_dir = default_log_dir();
    planetoid_log::init_logging(log_dir.as_deref(), Some(&config));
    info!(
        "Starting Planetoid {}x{} (config: {})",
        config.window.width,
        config.window.height,
        config_dir
            .as_ref()
            .map_or_else(|| "defaults".to_string(), |d| d.display().to_string())
    );

    match planetoid_app::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Planetoid exited with an error: {e}");
            ExitCode::FAILURE
        }
    }
}
