//! JSON scene description used by the command line tool.
//!
//! ```json
//! {
//!   "settings": { "resolution": 16, "step_size": [0.5, 0.5, 0.5] },
//!   "meshes": [{ "name": "floor", "vertices": [...], "stride": 6,
//!                "position_offset": 0, "normal_offset": 3, "indices": [0, 1, 2] }],
//!   "renderables": ["floor", "floor"],
//!   "lights": [{ "position": [0, 4, 0], "color": [1, 1, 1] }]
//! }
//! ```
//!
//! Strides and offsets are in floats. `renderables` lists mesh names as
//! drawn (repeats allowed); when absent every mesh is drawn once.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bake::Light;
use crate::config::BakeSettings;
use crate::geom::{MeshBuffers, MeshHandle, StaticMeshes};
use crate::util::{Error, Result};

/// One mesh with interleaved float vertex data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMesh {
    pub name: String,
    pub vertices: Vec<f32>,
    pub stride: usize,
    pub position_offset: usize,
    pub normal_offset: usize,
    pub indices: Vec<u16>,
}

impl SceneMesh {
    pub fn to_buffers(&self) -> MeshBuffers {
        MeshBuffers::from_floats(
            self.name.clone(),
            &self.vertices,
            self.stride,
            self.position_offset,
            self.normal_offset,
            self.indices.clone(),
        )
    }
}

/// Whole scene file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub settings: BakeSettings,
    pub meshes: Vec<SceneMesh>,
    pub renderables: Vec<String>,
    pub lights: Vec<Light>,
}

impl SceneFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Mesh handles in draw order; a mesh drawn twice yields the same handle twice.
    pub fn provider(&self) -> Result<StaticMeshes> {
        let handles: HashMap<&str, MeshHandle> = self
            .meshes
            .iter()
            .map(|m| (m.name.as_str(), Arc::new(m.to_buffers())))
            .collect();
        if handles.len() != self.meshes.len() {
            return Err(Error::invalid("mesh names must be unique"));
        }

        if self.renderables.is_empty() {
            let all = self.meshes.iter().map(|m| Arc::clone(&handles[m.name.as_str()])).collect();
            return Ok(StaticMeshes::new(all));
        }

        let drawn = self
            .renderables
            .iter()
            .map(|name| {
                handles
                    .get(name.as_str())
                    .cloned()
                    .ok_or_else(|| Error::invalid(format!("renderable references unknown mesh '{name}'")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(StaticMeshes::new(drawn))
    }
}
