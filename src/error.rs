//! Error types for sightcone

use thiserror::Error;

/// Rejected cone parameters
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConeError {
    #[error("cone half-angle must be non-negative, got {0}")]
    NegativeHalfAngle(f32),

    #[error("cone {field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
}

/// Level loading error
#[derive(Error, Debug)]
pub enum LevelError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse level JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("level data has {actual} tiles, expected {expected} ({width}x{height})")]
    SizeMismatch {
        width: i32,
        height: i32,
        expected: usize,
        actual: usize,
    },

    #[error("unknown tile code {code} at index {index}")]
    UnknownTile { code: u8, index: usize },

    #[error("invalid level text: {0}")]
    Text(String),
}

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}
