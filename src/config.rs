use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub cone: ConeConfig,
    #[serde(default)]
    pub level: LevelConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct GridConfig {
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ConeConfig {
    /// Half of the flashlight opening, degrees
    #[serde(default = "default_half_angle")]
    pub half_angle: f32,
    #[serde(default = "default_ray_length")]
    pub ray_length: f32,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct LevelConfig {
    /// Level file (.json or text glyph map). Empty uses the built-in level.
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_agent_speed")]
    pub agent_speed: f32,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct VisualConfig {
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    #[serde(default = "default_true")]
    pub show_edges: bool,
    #[serde(default)]
    pub show_rays: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// tracing-subscriber filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default values
fn default_cell_size() -> f32 { 32.0 }
fn default_half_angle() -> f32 { 30.0 }
fn default_ray_length() -> f32 { crate::visibility::DEFAULT_RAY_LENGTH }
fn default_agent_speed() -> f32 { 160.0 }
fn default_bg_r() -> u8 { 0 }
fn default_bg_g() -> u8 { 0 }
fn default_bg_b() -> u8 { 0 }
fn default_true() -> bool { true }
fn default_log_filter() -> String { "sightcone=info".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
        }
    }
}

impl Default for ConeConfig {
    fn default() -> Self {
        Self {
            half_angle: default_half_angle(),
            ray_length: default_ray_length(),
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            agent_speed: default_agent_speed(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            show_edges: default_true(),
            show_rays: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            cone: ConeConfig::default(),
            level: LevelConfig::default(),
            visual: VisualConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from config.toml, or use defaults if it is missing
    /// or invalid
    pub fn load() -> Self {
        let path = Path::new("config.toml");
        if !path.exists() {
            info!("No config.toml found, using default configuration");
            return Config::default();
        }

        match Self::from_path(path) {
            Ok(config) => {
                info!("Loaded configuration from config.toml");
                config
            }
            Err(e) => {
                warn!("Failed to load config.toml: {}; using default configuration", e);
                Config::default()
            }
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Replace values the viewer cannot use with defaults, warning once for each.
    /// Call after the tracing subscriber is installed.
    pub fn validated(mut self) -> Self {
        if !(self.cone.half_angle.is_finite() && self.cone.half_angle >= 0.0) {
            warn!("Invalid cone.half_angle {}; using {}", self.cone.half_angle, default_half_angle());
            self.cone.half_angle = default_half_angle();
        }
        if !(self.cone.ray_length.is_finite() && self.cone.ray_length > 0.0) {
            warn!("Invalid cone.ray_length {}; using {}", self.cone.ray_length, default_ray_length());
            self.cone.ray_length = default_ray_length();
        }
        if !(self.grid.cell_size.is_finite() && self.grid.cell_size > 0.0) {
            warn!("Invalid grid.cell_size {}; using {}", self.grid.cell_size, default_cell_size());
            self.grid.cell_size = default_cell_size();
        }
        if !(self.level.agent_speed.is_finite() && self.level.agent_speed >= 0.0) {
            warn!("Invalid level.agent_speed {}; using {}", self.level.agent_speed, default_agent_speed());
            self.level.agent_speed = default_agent_speed();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cone.half_angle, 30.0);
        assert_eq!(config.grid.cell_size, 32.0);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml(
            r#"
            [cone]
            half_angle = 45.0

            [visual]
            show_rays = true
            "#,
        )
        .unwrap();
        assert_eq!(config.cone.half_angle, 45.0);
        assert_eq!(config.cone.ray_length, 1000.0);
        assert!(config.visual.show_rays);
        assert!(config.visual.show_edges);
    }

    #[test]
    fn test_out_of_range_values_use_defaults() {
        let config = Config::from_toml(
            r#"
            [grid]
            cell_size = 0.0

            [cone]
            half_angle = -10.0
            ray_length = inf
            "#,
        )
        .unwrap()
        .validated();
        assert_eq!(config.cone.half_angle, 30.0);
        assert_eq!(config.cone.ray_length, 1000.0);
        assert_eq!(config.grid.cell_size, 32.0);

        let config = Config::from_toml("[cone]\nhalf_angle = nan").unwrap().validated();
        assert_eq!(config.cone.half_angle, 30.0);

        // Wide cones are valid, 180 and above is a full circle
        let config = Config::from_toml("[cone]\nhalf_angle = 200.0").unwrap().validated();
        assert_eq!(config.cone.half_angle, 200.0);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::from_toml("[cone]\nhalf_angle = \"wide\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
