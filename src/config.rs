//! Bake settings, stored as JSON.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::bake::VolumeParameters;
use crate::util::Result;

/// Settings for a bake. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeSettings {
    pub enabled: bool,

    // Lattice
    pub origin: [f32; 3],
    pub step_size: [f32; 3],
    pub resolution: u32, // even, > 0

    // Debug view
    pub global_light_intensity: f32,

    // Extraction pool, 0 = rayon default
    pub worker_threads: usize,
}

impl Default for BakeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            origin: [0.0; 3],
            step_size: [1.0; 3],
            resolution: 32,
            global_light_intensity: 8.0,
            worker_threads: 0,
        }
    }
}

impl BakeSettings {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save settings as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Validated lattice parameters.
    pub fn volume_parameters(&self) -> Result<VolumeParameters> {
        VolumeParameters::new(
            Vec3::from_array(self.origin),
            Vec3::from_array(self.step_size),
            self.resolution,
        )
    }
}
