//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Planetoid command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "planetoid", about = "Procedural planet viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Multisample count for the scene (1 disables antialiasing).
    #[arg(long)]
    pub msaa: Option<u32>,

    /// Directory with `.wgsl` shader overrides.
    #[arg(long)]
    pub shader_dir: Option<PathBuf>,

    /// Fixed seed for background star placement.
    #[arg(long)]
    pub star_seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(samples) = args.msaa {
            self.window.msaa_samples = samples;
        }
        if let Some(ref dir) = args.shader_dir {
            self.shaders.dir = Some(dir.clone());
        }
        if let Some(seed) = args.star_seed {
            self.world.star_seed = Some(seed);
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            shader_dir: Some(PathBuf::from("/tmp/shaders")),
            star_seed: Some(99),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.shaders.dir, Some(PathBuf::from("/tmp/shaders")));
        assert_eq!(config.world.star_seed, Some(99));
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "planetoid",
            "--width",
            "640",
            "--log-level",
            "debug",
            "--shader-dir",
            "shaders",
            "--msaa",
            "1",
        ]);
        assert_eq!(args.width, Some(640));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.shader_dir, Some(PathBuf::from("shaders")));
        assert_eq!(args.msaa, Some(1));
        assert!(args.config.is_none());

        let mut config = Config::default();
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.msaa_samples, 1);
    }
}
