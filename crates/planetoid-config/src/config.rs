//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
const CONFIG_FILE: &str = "config.ron";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Camera and orbit-control settings.
    pub camera: CameraConfig,
    /// Scene construction constants.
    pub world: WorldConfig,
    /// Shader source location.
    pub shaders: ShaderConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Samples per pixel for the scene pass; lowered to what the GPU supports.
    pub msaa_samples: u32,
    /// Window title.
    pub title: String,
}

/// Perspective camera and orbit-control configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Initial distance from the orbit target along +Z.
    pub distance: f32,
    /// Drag-to-rotate sensitivity.
    pub rotate_speed: f32,
    /// Fraction of the pending motion applied per update.
    pub damping_factor: f32,
    /// Allow wheel zoom.
    pub enable_zoom: bool,
    /// Allow drag rotation.
    pub enable_rotate: bool,
    /// Allow right-drag panning of the orbit target.
    pub enable_pan: bool,
    /// Closest allowed distance to the target.
    pub min_distance: f32,
    /// Farthest allowed distance to the target.
    pub max_distance: f32,
}

/// Scene construction constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Planet (and ocean, sun) sphere radius.
    pub planet_radius: f32,
    /// Moon sphere radius.
    pub moon_radius: f32,
    /// Horizontal sphere segments.
    pub segments: u32,
    /// Vertical sphere rings.
    pub rings: u32,
    /// Moon offset inside its orbit pivot.
    pub moon_offset: [f32; 3],
    /// Directional light (and sun mesh) position.
    pub light_position: [f32; 3],
    /// Number of background stars.
    pub star_count: u32,
    /// Radius of a single star sphere.
    pub star_radius: f32,
    /// Inner radius of the star shell.
    pub star_min_radius: f32,
    /// Outer radius of the star shell.
    pub star_max_radius: f32,
    /// Fixed star placement seed; a fresh sky every launch when `None`.
    pub star_seed: Option<u64>,
}

/// Where shader sources are read from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShaderConfig {
    /// Directory holding `.wgsl` overrides. Embedded sources are used for
    /// anything missing, or for everything when unset.
    pub dir: Option<PathBuf>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g. "debug", "info,planetoid_render=trace").
    pub log_level: String,
    /// Write a JSON log file next to the console output.
    pub file_logging: bool,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            msaa_samples: 4,
            title: "Planetoid".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 60.0,
            near: 1.0,
            far: 5000.0,
            distance: 500.0,
            rotate_speed: 0.05,
            damping_factor: 0.05,
            enable_zoom: true,
            enable_rotate: true,
            enable_pan: true,
            min_distance: 130.0,
            max_distance: 2500.0,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            planet_radius: 100.0,
            moon_radius: 20.0,
            segments: 128,
            rings: 128,
            moon_offset: [0.0, 150.0, 100.0],
            light_position: [1000.0, 1000.0, 1000.0],
            star_count: 200,
            star_radius: 1.0,
            star_min_radius: 500.0,
            star_max_radius: 1000.0,
            star_seed: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            file_logging: cfg!(debug_assertions),
        }
    }
}

/// Platform config directory for Planetoid, if the platform has one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("planetoid"))
}

/// Platform directory for log files, if the platform has one.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("planetoid").join("logs"))
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::ReadError {
                    path: config_path.clone(),
                    source,
                })?;
            let config: Config =
                ron::from_str(&contents).map_err(|source| ConfigError::ParseError {
                    path: config_path.clone(),
                    source,
                })?;
            tracing::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            tracing::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("star_count: 200"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.world.star_seed = Some(7);
        config.shaders.dir = Some(PathBuf::from("assets/shaders"));
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (width: 800), camera: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.world, WorldConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_star_shell_defaults_are_ordered() {
        let world = WorldConfig::default();
        assert!(world.star_min_radius < world.star_max_radius);
        assert!(world.star_min_radius > world.planet_radius);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.camera.damping_factor = 0.1;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert_eq!(err.path(), Some(dir.path().join(CONFIG_FILE).as_path()));
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
