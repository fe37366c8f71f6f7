//! Volume texture ownership and the rendering backend boundary.
//!
//! - [`VolumeBackend`] - What a renderer must provide to receive a volume
//! - [`VolumeTexture`] - Lazily allocated, reused, singly released identity
//! - [`PhotonVolume`] - Bake + upload + dispose orchestration
//! - [`MemoryBackend`] - In-memory backend for tools and tests

mod backend;
mod baker;
mod memory;
mod texture;

pub use backend::{Filter, TextureId, VolumeBackend, VolumeUpload, Wrap};
pub use baker::PhotonVolume;
pub use memory::{MemoryBackend, StoredVolume};
pub use texture::{VolumeTexture, UNALLOCATED};
