//! Render settings loaded from TOML

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Color;
use crate::error::ConfigError;
use crate::math::{self, Vector3};
use crate::projection::{Matrix44, Perspective};

/// Directional light plus the ambient/base color of the model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    pub model_color: Color,
    pub light_direction: Vector3,
    pub light_color: Color,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            model_color: Color::new(100.0, 100.0, 100.0),
            light_direction: math::RIGHT,
            light_color: Color::new(100.0, 100.0, 100.0),
        }
    }
}

/// What the host puts on the surface and how it paces the draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawSettings {
    /// Time budget per incremental draw call; 0 draws the model in one go.
    pub iteration_time_ms: u64,
    pub draw_faces: bool,
    pub draw_edges: bool,
    pub edge_color: Color,
    pub background_color: Color,
    pub text_color: Color,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            iteration_time_ms: 50,
            draw_faces: true,
            draw_edges: false,
            edge_color: Color::new(255.0, 180.0, 50.0),
            background_color: Color::new(20.0, 20.0, 65.0),
            text_color: Color::new(180.0, 230.0, 250.0),
        }
    }
}

/// All host-tunable render parameters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub projection: Perspective,
    pub lighting: LightingSettings,
    pub draw: DrawSettings,
}

impl RenderSettings {
    /// Load settings from a `.toml` file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.extension().and_then(|e| e.to_str()) != Some("toml") {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_toml(&contents)?;
        log::debug!("loaded render settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn projection_matrix(&self) -> Matrix44 {
        self.projection.matrix()
    }
}
