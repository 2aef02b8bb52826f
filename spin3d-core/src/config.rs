//! Render configuration
//!
//! Every field has a default, so a TOML file only needs the keys it wants to
//! change.
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::Color;
use crate::math::{self, Vec4};
use crate::shading::{Lighting, Winding};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Initial distance from the camera to the mesh origin
    pub distance: f32,
    /// Closest the mesh may be zoomed in; must lie beyond `near`
    pub min_distance: f32,
    /// Radians added to the rotation angle on every animated tick
    pub rotation_step: f32,
    /// Direction from the surface toward the light
    pub light_direction: [f32; 3],
    pub base_color: [u8; 3],
    pub winding: Winding,
    pub flip_y: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov: FRAC_PI_2,
            near: 0.1,
            far: 1000.0,
            distance: 10.0,
            min_distance: 0.5,
            rotation_step: 0.02,
            light_direction: [0.0, 0.0, -1.0],
            base_color: [255, 255, 255],
            winding: Winding::Clockwise,
            flip_y: false,
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn light_vector(&self) -> Vec4 {
        let [x, y, z] = self.light_direction;
        math::direction(x, y, z)
    }

    pub fn lighting(&self) -> Result<Lighting> {
        Lighting::new(self.light_vector(), Color::from(self.base_color))
    }
}
