//! Run configuration
//!
//! All render constants are fixed at startup. Defaults give the stock
//! spinning-cube scene; a RON file can override any of them.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::rasterizer::{Light, RasterSettings, RenderMode, HEIGHT, WIDTH};

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything the renderer and the outer loop need for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Grid width in characters
    pub grid_width: usize,
    /// Grid height in characters
    pub grid_height: usize,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub light: Light,
    /// Initial camera position
    pub camera_position: Vec3,
    /// Forward/backward movement per frame while a key is held
    pub camera_speed: f32,
    /// Strafe movement per frame while a key is held
    pub camera_speed_right: f32,
    /// Camera rotation per frame while an arrow key is held (radians)
    pub rotate_speed: f32,
    /// Model spin rate (radians per second)
    pub spin_rate: f32,
    /// Delay between frames in milliseconds
    pub frame_delay_ms: u64,
    pub mode: RenderMode,
    /// Optional RON mesh file to render instead of the built-in cube
    pub mesh_path: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            grid_width: WIDTH,
            grid_height: HEIGHT,
            fov_degrees: 90.0,
            near_plane: 0.1,
            far_plane: 7.0,
            light: Light::default(),
            camera_position: Vec3::new(2.0, 0.0, 2.0),
            camera_speed: 0.05,
            camera_speed_right: 0.03,
            rotate_speed: 0.05,
            spin_rate: 1.0,
            frame_delay_ms: 33,
            mode: RenderMode::Filled,
            mesh_path: None,
        }
    }
}

impl RenderConfig {
    /// Load a config from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: RenderConfig = ron::from_str(&contents)?;
        Ok(config)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.grid_width as f32 / self.grid_height as f32
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    /// Rasterizer settings derived from this config
    pub fn raster_settings(&self) -> RasterSettings {
        RasterSettings {
            mode: self.mode,
            light: self.light,
            near: self.near_plane,
            far: self.far_plane,
        }
    }
}
