//! RGBA8 texel encoding of baked samples.

use bytemuck::{Pod, Zeroable};

use super::lattice::SamplePoint;
use super::params::VolumeParameters;
use crate::util::{Error, Result, Rgb};

/// Bytes per encoded voxel.
pub const TEXEL_SIZE: usize = 4;

/// One encoded voxel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Texel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Texel {
    /// Encode a colour; alpha is always opaque.
    #[inline]
    pub fn from_rgb(c: Rgb) -> Self {
        Self {
            r: encode_channel(c.x),
            g: encode_channel(c.y),
            b: encode_channel(c.z),
            a: u8::MAX,
        }
    }
}

/// `clamp(v * 255, 0, 255)` truncated to a byte. NaN encodes as 0.
#[inline]
pub fn encode_channel(v: f32) -> u8 {
    (v * 255.0).clamp(0.0, 255.0) as u8
}

/// Dense RGBA8 volume, voxels in lattice order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeBuffer {
    resolution: u32,
    data: Vec<u8>,
}

impl VolumeBuffer {
    /// Edge length of the volume in voxels.
    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Encoded bytes, ready for upload from the start.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Encoded voxels.
    #[inline]
    pub fn texels(&self) -> &[Texel] {
        bytemuck::cast_slice(&self.data)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Encode samples (in lattice order) into an RGBA8 buffer of `R³ * 4` bytes.
#[tracing::instrument(skip_all, fields(resolution = params.resolution()))]
pub fn encode_texels(samples: &[SamplePoint], params: &VolumeParameters) -> Result<VolumeBuffer> {
    let expected = params.sample_count();
    if samples.len() != expected {
        return Err(Error::SampleCountMismatch {
            expected,
            actual: samples.len(),
        });
    }

    tracing::debug!("Populate texel data buffer");
    let texels: Vec<Texel> = samples.iter().map(|s| Texel::from_rgb(s.color)).collect();
    Ok(VolumeBuffer {
        resolution: params.resolution(),
        data: bytemuck::cast_vec(texels),
    })
}
