//! Debug markers for visualizing a bake.
//!
//! Read-only view over a [`BakeResult`]: one small marker per sample, centred
//! in its lattice cell and tinted by the sample colour times the global
//! light intensity. Drawing them is up to the host renderer.

use glam::Vec3;
use serde::Serialize;

use crate::bake::BakeResult;
use crate::util::Rgb;

/// Uniform scale of a marker relative to a unit sphere.
pub const MARKER_SCALE: f32 = 0.32;

/// One sample to draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleMarker {
    pub position: Vec3,
    pub scale: f32,
    pub color: Rgb,
}

/// Markers for every sample of `result`, in lattice order.
pub fn sample_markers(result: &BakeResult, intensity: f32) -> Vec<SampleMarker> {
    let half_step = result.params().step_size() * 0.5;
    result
        .samples()
        .iter()
        .map(|s| SampleMarker {
            position: s.position + half_step,
            scale: MARKER_SCALE,
            color: s.color * intensity,
        })
        .collect()
}
