//! # Photon
//!
//! Offline baker for static direct-light visibility volumes.
//!
//! Scene geometry is flattened into a triangle soup, a regular 3D lattice of
//! sample points is laid around an origin, and for each sample every point
//! light is tested for occlusion by a shadow ray. The merged, attenuated
//! light colours are packed into a dense RGBA8 buffer ready to be uploaded
//! as a 3D texture.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math re-exports
//! - [`geom`] - Mesh buffers, triangle soup, parallel extraction
//! - [`core`] - Triangle cache, cancellation, worker pool
//! - [`bake`] - Lattice, visibility, texel encoding
//! - [`volume`] - Texture identity lifecycle and backend boundary
//! - [`world`] - Scene wrapper with cached triangles
//! - [`debug`] - Sample markers for visualization
//! - [`config`] / [`scene`] - JSON settings and scene files
//!
//! ## Example
//!
//! ```ignore
//! use photon::prelude::*;
//!
//! let world = World::new(StaticMeshes::new(meshes));
//! let tris = world.triangles()?;
//! let params = VolumeParameters::new(Vec3::ZERO, Vec3::splat(0.5), 32)?;
//!
//! let mut volume = PhotonVolume::new();
//! volume.bake_with(&tris, &lights, &params)?;
//! volume.upload(&mut backend)?;
//! ```

pub mod util;
pub mod geom;
pub mod core;
pub mod bake;
pub mod volume;
pub mod world;
pub mod debug;
pub mod config;
pub mod scene;

// Re-export commonly used types
pub use util::{Error, Result};
pub use bake::{bake, BakeResult, Light, VolumeBuffer, VolumeParameters};
pub use world::World;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, Rgb, Vec3};
    pub use crate::geom::{MeshBuffers, MeshHandle, MeshProvider, StaticMeshes, Triangle, Vertex};
    pub use crate::bake::{bake, BakeResult, Light, SamplePoint, VolumeBuffer, VolumeParameters};
    pub use crate::volume::{MemoryBackend, PhotonVolume, TextureId, VolumeBackend};
    pub use crate::config::BakeSettings;
    pub use crate::world::World;
}
