//! Scene geometry for occlusion testing.
//!
//! This module provides:
//! - [`MeshBuffers`] / [`MeshProvider`] - Raw interleaved mesh data and its source
//! - [`Vertex`] / [`Triangle`] - The triangle soup and its ray test
//! - [`extract_scene`] / [`extract_triangles`] - Parallel mesh flattening

pub mod extract;
pub mod mesh;
pub mod triangle;

pub use extract::{distinct_meshes, extract_scene, extract_triangles, triangles_from_mesh};
pub use mesh::{MeshBuffers, MeshHandle, MeshProvider, StaticMeshes};
pub use triangle::{closest_hit, Triangle, Vertex, RAY_EPSILON};
