//! Offline volume baker: owns the last bake and its texture identity.

use glam::Vec3;

use super::backend::{TextureId, VolumeBackend};
use super::texture::VolumeTexture;
use crate::bake::{bake, BakeResult, Light, VolumeBuffer, VolumeParameters};
use crate::config::BakeSettings;
use crate::geom::Triangle;
use crate::util::Result;

/// Bakes visibility volumes and hands them to a rendering backend.
///
/// Baking and uploading are separate steps: [`bake`](Self::bake) runs
/// anywhere, [`upload`](Self::upload) must be called where the backend's
/// graphics context lives. A failed bake leaves the previous state as it was.
#[derive(Debug)]
pub struct PhotonVolume {
    pub enabled: bool,
    /// Lattice centre used by [`bake`](Self::bake).
    pub target_origin: Vec3,
    /// Lattice cell size used by [`bake`](Self::bake).
    pub target_step_size: Vec3,
    /// Scale applied to sample colours by debug views.
    pub global_light_intensity: f32,
    texture: VolumeTexture,
    result: Option<BakeResult>,
    pending: Option<VolumeBuffer>,
}

impl Default for PhotonVolume {
    fn default() -> Self {
        Self::from_settings(&BakeSettings::default())
    }
}

impl PhotonVolume {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &BakeSettings) -> Self {
        Self {
            enabled: settings.enabled,
            target_origin: Vec3::from_array(settings.origin),
            target_step_size: Vec3::from_array(settings.step_size),
            global_light_intensity: settings.global_light_intensity,
            texture: VolumeTexture::new(),
            result: None,
            pending: None,
        }
    }

    /// Enabled and backed by an uploaded texture.
    pub fn can_render(&self) -> bool {
        self.enabled && self.texture.is_allocated()
    }

    /// Last successful bake.
    pub fn result(&self) -> Option<&BakeResult> {
        self.result.as_ref()
    }

    pub fn texture(&self) -> &VolumeTexture {
        &self.texture
    }

    /// Encoded volume waiting for [`upload`](Self::upload).
    pub fn pending(&self) -> Option<&VolumeBuffer> {
        self.pending.as_ref()
    }

    /// Bake at `resolution` around the target origin with the target step size.
    pub fn bake(&mut self, triangles: &[Triangle], lights: &[Light], resolution: u32) -> Result<&VolumeBuffer> {
        let params = VolumeParameters::new(self.target_origin, self.target_step_size, resolution)?;
        self.bake_with(triangles, lights, &params)
    }

    /// Bake with explicit parameters; the encoded volume becomes pending.
    pub fn bake_with(
        &mut self,
        triangles: &[Triangle],
        lights: &[Light],
        params: &VolumeParameters,
    ) -> Result<&VolumeBuffer> {
        tracing::info!("Compositing volume texture");
        let result = bake(triangles, lights, params);
        let buffer = result.encode()?;
        self.result = Some(result);
        let buffer = self.pending.insert(buffer);
        Ok(&*buffer)
    }

    /// Upload the pending volume. `Ok(None)` when there is nothing to upload.
    pub fn upload(&mut self, backend: &mut dyn VolumeBackend) -> Result<Option<TextureId>> {
        let Some(buffer) = self.pending.take() else {
            return Ok(None);
        };
        tracing::info!("Building volume texture ({}³)", buffer.resolution());
        match self.texture.upload(backend, &buffer) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                self.pending = Some(buffer);
                Err(e)
            }
        }
    }

    /// Release the texture and drop the stored bake. Safe to call repeatedly.
    pub fn dispose(&mut self, backend: &mut dyn VolumeBackend) {
        self.texture.release(backend);
        self.result = None;
        self.pending = None;
    }
}
