//! Viewer configuration, read from an optional JSON file.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use umbra_core::Projection;
use umbra_window::WindowSettings;

/// Smallest accepted number of frames in flight.
pub const MIN_FRAME_COUNT: usize = 2;
const FOV_RANGE: std::ops::RangeInclusive<f32> = 1.0..=179.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    // Window
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,

    // Presentation
    pub frame_count: usize,
    pub vsync: bool,

    // Scene
    pub scene_path: Option<PathBuf>,
    pub background_color: [f32; 3],
    pub shadow_bias: f32,

    // Camera
    pub camera_translation: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "Umbra".to_string(),
            window_width: 1280,
            window_height: 720,
            frame_count: 3,
            vsync: true,
            scene_path: None,
            background_color: [0.2, 0.2, 0.2],
            shadow_bias: 0.5,
            camera_translation: [0.0, -0.25, 1.5],
            fov_degrees: 45.0,
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl ViewerConfig {
    /// Reads `path`; fields missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config.validated())
    }

    /// Clamps values the viewer cannot work with.
    pub fn validated(mut self) -> Self {
        if self.frame_count < MIN_FRAME_COUNT {
            log::warn!(
                "frame_count {} is too small, using {MIN_FRAME_COUNT}",
                self.frame_count
            );
            self.frame_count = MIN_FRAME_COUNT;
        }
        self.shadow_bias = self.shadow_bias.clamp(0.0, 5.0);
        if !FOV_RANGE.contains(&self.fov_degrees) {
            let fallback = Projection::default().fov.to_degrees();
            log::warn!(
                "field of view {} is out of range, using {fallback}",
                self.fov_degrees
            );
            self.fov_degrees = fallback;
        }
        if !(self.near > 0.0 && self.far > self.near) {
            let defaults = Projection::default();
            log::warn!(
                "invalid clip planes ({}, {}), using ({}, {})",
                self.near,
                self.far,
                defaults.near,
                defaults.far
            );
            self.near = defaults.near;
            self.far = defaults.far;
        }
        self
    }

    pub fn window_settings(&self) -> WindowSettings {
        WindowSettings {
            title: self.window_title.clone(),
            width: self.window_width,
            height: self.window_height,
        }
    }

    pub fn projection(&self) -> Projection {
        Projection::from_degrees(self.fov_degrees, self.near, self.far)
    }

    pub fn camera_translation(&self) -> Vec3 {
        Vec3::from(self.camera_translation)
    }
}
