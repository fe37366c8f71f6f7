//! Visibility volume bake.
//!
//! ```text
//! VolumeParameters → sample lattice → per-sample visibility (triangles + lights)
//!                  → BakeResult → RGBA8 VolumeBuffer
//! ```
//!
//! - [`VolumeParameters`] - Lattice placement, validated on construction
//! - [`sample_points`] - Lattice generation
//! - [`evaluate`] - Occlusion ray casts and light merging
//! - [`encode_texels`] - RGBA8 packing
//! - [`bake`] / [`BakeResult`] - The whole pipeline as an owned value

pub mod encode;
pub mod lattice;
pub mod light;
pub mod params;
pub mod visibility;

pub use encode::{encode_channel, encode_texels, Texel, VolumeBuffer, TEXEL_SIZE};
pub use lattice::{sample_points, SamplePoint};
pub use light::Light;
pub use params::VolumeParameters;
pub use visibility::{evaluate, light_influence, sample_visibility, LIGHT_BLEND};

use crate::geom::Triangle;
use crate::util::Result;

/// Output of one bake: the parameters used and every sample in lattice order.
///
/// Consumers (upload, debug markers) borrow it read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct BakeResult {
    params: VolumeParameters,
    samples: Vec<SamplePoint>,
}

impl BakeResult {
    #[inline]
    pub fn params(&self) -> &VolumeParameters {
        &self.params
    }

    #[inline]
    pub fn samples(&self) -> &[SamplePoint] {
        &self.samples
    }

    /// Sample at zero-based lattice coordinates.
    pub fn sample_at(&self, ix: u32, iy: u32, iz: u32) -> Option<&SamplePoint> {
        let r = self.params.resolution();
        if ix >= r || iy >= r || iz >= r {
            return None;
        }
        self.samples.get(self.params.index_of(ix, iy, iz))
    }

    /// Pack the samples into an RGBA8 volume.
    pub fn encode(&self) -> Result<VolumeBuffer> {
        encode_texels(&self.samples, &self.params)
    }
}

/// Bake the visibility of `lights` through `triangles` on the lattice of `params`.
#[tracing::instrument(skip_all, fields(resolution = params.resolution(), lights = lights.len(), tris = triangles.len()))]
pub fn bake(triangles: &[Triangle], lights: &[Light], params: &VolumeParameters) -> BakeResult {
    tracing::info!(
        "Baking {} samples against {} triangles and {} lights",
        params.sample_count(),
        triangles.len(),
        lights.len()
    );
    let mut samples = sample_points(params);
    evaluate(&mut samples, lights, triangles);
    BakeResult {
        params: *params,
        samples,
    }
}
