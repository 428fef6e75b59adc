//! Viewer configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it overrides:
//!
//! ```
//! use bathyscope::ViewerConfig;
//!
//! let config = ViewerConfig::from_json(r#"{ "window": { "width": 1280 }, "ortho_distance": 8.0 }"#)
//!     .unwrap();
//! assert_eq!(config.window.width, 1280);
//! assert_eq!(config.window.height, 600);
//! assert_eq!(config.ortho_distance, 8.0);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "bathyscope".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
        }
    }
}

/// Clip planes of the main camera.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 250.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RovConfig {
    /// Units per second.
    pub speed: f32,
}

impl Default for RovConfig {
    fn default() -> Self {
        Self { speed: 5.0 }
    }
}

/// Instance counts and the RNG seed used to scatter them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneryConfig {
    /// Fixed seed for reproducible layouts; entropy when absent.
    pub seed: Option<u64>,
    pub grass: usize,
    pub fish: usize,
    pub banana: usize,
    pub crates: usize,
    pub plastic: usize,
}

impl Default for SceneryConfig {
    fn default() -> Self {
        Self {
            seed: None,
            grass: 600,
            fish: 200,
            banana: 50,
            crates: 20,
            plastic: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub projection: ProjectionConfig,
    /// Distance of the side-view cameras from their subject.
    pub ortho_distance: f32,
    pub rov: RovConfig,
    pub scenery: SceneryConfig,
    /// Directory the textures are loaded from.
    pub asset_dir: PathBuf,
    /// Frames per second of sprite animations.
    pub key_frame_rate: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            projection: ProjectionConfig::default(),
            ortho_distance: 5.0,
            rov: RovConfig::default(),
            scenery: SceneryConfig::default(),
            asset_dir: PathBuf::from("Resources/Textures"),
            key_frame_rate: 12,
        }
    }
}

impl ViewerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ProjectionConfig { near, far } = self.projection;
        if near <= 0.0 {
            return Err(ConfigError::Invalid(format!("near plane must be positive, got {near}")));
        }
        if far <= near {
            return Err(ConfigError::Invalid(format!(
                "far plane ({far}) must lie beyond near plane ({near})"
            )));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".into()));
        }
        if self.ortho_distance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "ortho distance must be positive, got {}",
                self.ortho_distance
            )));
        }
        Ok(())
    }

    /// Set the window size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// Start in borderless fullscreen.
    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.window.fullscreen = fullscreen;
        self
    }

    /// Use a fixed seed for the scenery layout.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.scenery.seed = Some(seed);
        self
    }

    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }
}
