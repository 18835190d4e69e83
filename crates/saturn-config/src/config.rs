//! Configuration sections, their defaults, and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name used inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Platform config directory for the backdrop (`<config>/saturn-backdrop`).
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("saturn-backdrop")
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub scene: SceneConfig,
    pub input: InputConfig,
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial width in logical pixels.
    pub width: u32,
    /// Initial height in logical pixels.
    pub height: u32,
    pub fullscreen: bool,
    /// Present with `Fifo` when set; prefer `Mailbox` or `Immediate` otherwise.
    pub vsync: bool,
    pub title: String,
}

/// Camera and surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Upper bound applied to the device pixel ratio sampled at mount.
    pub max_pixel_ratio: f64,
    /// Color the scene target is cleared to before the background plane.
    pub clear_color: [f64; 3],
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance of the viewer from the origin along +Z.
    pub camera_z: f32,
}

/// Population sizes and stochastic parameters of the scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub star_count: u32,
    pub cloud_count: u32,
    pub shooting_star_capacity: u32,
    pub trail_capacity: u32,
    /// Minimum seconds between shooting star spawn attempts.
    pub spawn_interval: f32,
    /// Per-frame chance of a spawn once the interval has elapsed.
    pub spawn_probability: f32,
    /// Draw the fullscreen nebula overlay that reacts to scrolling.
    pub nebula_overlay: bool,
    /// Fixed seed for reproducible scenes. `None` uses platform randomness.
    pub seed: Option<u64>,
}

/// Wheel mapping onto the global speed multiplier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Speed change per wheel pixel; the sign is inverted so scrolling up speeds up.
    pub wheel_speed_factor: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Saturn Nebula".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 1.5,
            clear_color: [0.0, 0.0, 0.0],
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 10_000.0,
            camera_z: 100.0,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_count: 8000,
            cloud_count: 6,
            shooting_star_capacity: 30,
            trail_capacity: 50,
            spawn_interval: 0.8,
            spawn_probability: 0.08,
            nebula_overlay: false,
            seed: None,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            wheel_speed_factor: 0.001,
            min_speed: 0.2,
            max_speed: 3.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load `config.ron` from `config_dir`, writing the defaults there if it is missing.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE_NAME), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }
}
