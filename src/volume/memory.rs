//! In-process [`VolumeBackend`] that keeps uploaded volumes in memory.
//!
//! Used by the CLI and the tests in place of a GPU.

use std::collections::HashMap;

use super::backend::{Filter, TextureId, VolumeBackend, VolumeUpload, Wrap};
use crate::util::{Error, Result};

/// Contents of one stored volume.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredVolume {
    pub resolution: u32,
    pub texels: Vec<u8>,
    pub filter: Filter,
    pub wrap: Wrap,
}

/// Texture store with allocation counters.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    next_id: u32,
    textures: HashMap<TextureId, Option<StoredVolume>>,
    created: usize,
    uploads: usize,
    deleted: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of `id`, if allocated and uploaded.
    pub fn volume(&self, id: TextureId) -> Option<&StoredVolume> {
        self.textures.get(&id).and_then(Option::as_ref)
    }

    /// Number of live texture identities.
    pub fn live(&self) -> usize {
        self.textures.len()
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn uploads(&self) -> usize {
        self.uploads
    }

    pub fn deleted(&self) -> usize {
        self.deleted
    }
}

impl VolumeBackend for MemoryBackend {
    fn create_texture(&mut self) -> Result<TextureId> {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.textures.insert(id, None);
        self.created += 1;
        Ok(id)
    }

    fn upload_volume(&mut self, id: TextureId, upload: &VolumeUpload<'_>) -> Result<()> {
        let r = upload.resolution as usize;
        let expected = r * r * r * 4;
        if upload.texels.len() != expected {
            return Err(Error::backend(format!(
                "volume of resolution {} needs {expected} bytes, got {}",
                upload.resolution,
                upload.texels.len()
            )));
        }
        let slot = self
            .textures
            .get_mut(&id)
            .ok_or_else(|| Error::backend(format!("unknown texture {id:?}")))?;
        *slot = Some(StoredVolume {
            resolution: upload.resolution,
            texels: upload.texels.to_vec(),
            filter: upload.filter,
            wrap: upload.wrap,
        });
        self.uploads += 1;
        Ok(())
    }

    fn delete_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_some() {
            self.deleted += 1;
        }
    }
}
