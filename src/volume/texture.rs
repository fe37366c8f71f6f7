//! Lifecycle of the baked volume's texture identity.

use super::backend::{TextureId, VolumeBackend, VolumeUpload};
use crate::bake::VolumeBuffer;
use crate::util::Result;

/// Sentinel reported by [`VolumeTexture::raw`] while nothing is allocated.
pub const UNALLOCATED: i64 = -1;

/// Texture identity of the baked volume.
///
/// Allocated lazily on the first upload, reused by later uploads, released
/// exactly once. Releasing twice is a no-op; uploading after a release
/// allocates a fresh identity.
#[derive(Debug, Default)]
pub struct VolumeTexture {
    id: Option<TextureId>,
}

impl VolumeTexture {
    pub const fn new() -> Self {
        Self { id: None }
    }

    #[inline]
    pub fn id(&self) -> Option<TextureId> {
        self.id
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.id.is_some()
    }

    /// Identity as an integer, [`UNALLOCATED`] when there is none.
    #[inline]
    pub fn raw(&self) -> i64 {
        self.id.map_or(UNALLOCATED, |id| id.0 as i64)
    }

    /// Upload `buffer`, allocating the identity first if needed.
    pub fn upload(&mut self, backend: &mut dyn VolumeBackend, buffer: &VolumeBuffer) -> Result<TextureId> {
        let id = match self.id {
            Some(id) => id,
            None => {
                let id = backend.create_texture()?;
                tracing::debug!("Allocated volume texture {:?}", id);
                self.id = Some(id);
                id
            }
        };
        backend.upload_volume(id, &VolumeUpload::new(buffer.resolution(), buffer.as_bytes()))?;
        Ok(id)
    }

    /// Free the identity if one is held.
    pub fn release(&mut self, backend: &mut dyn VolumeBackend) {
        if let Some(id) = self.id.take() {
            tracing::debug!("Releasing volume texture {:?}", id);
            backend.delete_texture(id);
        }
    }
}
