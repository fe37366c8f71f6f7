//! Raw mesh buffers as handed over by a rendering backend.
//!
//! A mesh is an interleaved vertex byte stream plus a 16-bit index stream
//! grouped in triples. Attribute offsets and the stride are in bytes;
//! attribute components are native-endian `f32`.

use std::sync::Arc;

use crate::util::{Error, Result};

/// Size of one attribute component in bytes.
pub const ELEMENT_SIZE: usize = std::mem::size_of::<f32>();

/// Size of a 3-component attribute (position or normal) in bytes.
pub const VEC3_SIZE: usize = 3 * ELEMENT_SIZE;

/// Interleaved vertex buffer + index buffer of one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffers {
    /// Name used in diagnostics.
    pub name: String,
    /// Interleaved vertex data.
    pub vertices: Vec<u8>,
    /// Bytes per vertex.
    pub stride: usize,
    /// Byte offset of the position attribute within a vertex.
    pub position_offset: usize,
    /// Byte offset of the normal attribute within a vertex.
    pub normal_offset: usize,
    /// Triangle list indices.
    pub indices: Vec<u16>,
}

impl MeshBuffers {
    /// Build from interleaved float data. `stride` and offsets are in floats.
    pub fn from_floats(
        name: impl Into<String>,
        data: &[f32],
        stride: usize,
        position_offset: usize,
        normal_offset: usize,
        indices: Vec<u16>,
    ) -> Self {
        Self {
            name: name.into(),
            vertices: bytemuck::cast_slice(data).to_vec(),
            stride: stride * ELEMENT_SIZE,
            position_offset: position_offset * ELEMENT_SIZE,
            normal_offset: normal_offset * ELEMENT_SIZE,
            indices,
        }
    }

    /// Number of whole vertices in the vertex buffer.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.vertices.len() / self.stride
        }
    }

    /// Number of triangles described by the index buffer.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check layout consistency; the error names this mesh.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(Error::malformed(&self.name, reason));

        if self.stride == 0 || self.stride % ELEMENT_SIZE != 0 {
            return fail(format!("vertex stride {} is not a positive multiple of {ELEMENT_SIZE}", self.stride));
        }
        for (attr, offset) in [("position", self.position_offset), ("normal", self.normal_offset)] {
            if offset % ELEMENT_SIZE != 0 {
                return fail(format!("{attr} offset {offset} is not aligned to {ELEMENT_SIZE} bytes"));
            }
            if offset + VEC3_SIZE > self.stride {
                return fail(format!("{attr} attribute at offset {offset} overruns stride {}", self.stride));
            }
        }
        if self.vertices.len() % self.stride != 0 {
            return fail(format!(
                "vertex buffer size {} is not a multiple of stride {}",
                self.vertices.len(),
                self.stride
            ));
        }
        if self.indices.len() % 3 != 0 {
            return fail(format!("index count {} is not a multiple of 3", self.indices.len()));
        }
        let count = self.vertex_count();
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            return fail(format!("index {bad} out of bounds (vertex count: {count})"));
        }
        Ok(())
    }
}

/// Shared handle to a mesh; identity (pointer) is what makes two handles "the same mesh".
pub type MeshHandle = Arc<MeshBuffers>;

/// Enumerates the meshes of a scene.
///
/// The same mesh may be reported more than once (one mesh drawn by several
/// renderables); the extractor deduplicates by handle identity.
pub trait MeshProvider: Send + Sync {
    fn meshes(&self) -> Vec<MeshHandle>;
}

/// Fixed list of meshes, the simplest provider.
#[derive(Debug, Clone, Default)]
pub struct StaticMeshes {
    pub meshes: Vec<MeshHandle>,
}

impl StaticMeshes {
    pub fn new(meshes: Vec<MeshHandle>) -> Self {
        Self { meshes }
    }
}

impl MeshProvider for StaticMeshes {
    fn meshes(&self) -> Vec<MeshHandle> {
        self.meshes.clone()
    }
}
