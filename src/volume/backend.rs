//! Rendering backend boundary for 3D volume textures.
//!
//! The baker never talks to a GPU. It hands encoded bytes to whatever
//! implements [`VolumeBackend`]; the host calls into it from the thread that
//! owns the graphics context.

use crate::util::Result;

/// Opaque texture identity issued by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Texture filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    Linear,
}

/// Texture coordinate wrapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wrap {
    #[default]
    Repeat,
}

/// A cubic RGBA8 volume ready to upload.
#[derive(Debug, Clone, Copy)]
pub struct VolumeUpload<'a> {
    /// Edge length in voxels (width = height = depth).
    pub resolution: u32,
    /// `resolution³ * 4` bytes, RGBA8.
    pub texels: &'a [u8],
    /// Min and mag filter.
    pub filter: Filter,
    /// Wrap mode on all three axes.
    pub wrap: Wrap,
}

impl<'a> VolumeUpload<'a> {
    /// Upload with linear filtering and repeat wrapping on every axis.
    pub fn new(resolution: u32, texels: &'a [u8]) -> Self {
        Self {
            resolution,
            texels,
            filter: Filter::Linear,
            wrap: Wrap::Repeat,
        }
    }
}

/// Backend able to own 3D textures.
pub trait VolumeBackend {
    /// Allocate a new texture identity.
    fn create_texture(&mut self) -> Result<TextureId>;

    /// (Re)define the contents of `id` as a 3D RGBA8 texture.
    fn upload_volume(&mut self, id: TextureId, upload: &VolumeUpload<'_>) -> Result<()>;

    /// Free `id`. Called at most once per identity.
    fn delete_texture(&mut self, id: TextureId);
}
