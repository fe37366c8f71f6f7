//! Sample lattice generation.
//!
//! The lattice covers `[-R/2, R/2)` cells on every axis around the origin,
//! iterated x outermost and z innermost (see [`VolumeParameters::index_of`]).
//! The texel encoder writes voxels in the same order.

use glam::Vec3;
use rayon::prelude::*;

use super::params::VolumeParameters;
use crate::util::{Rgb, BLACK};

/// One lattice sample: world position and its baked colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub position: Vec3,
    pub color: Rgb,
}

impl SamplePoint {
    #[inline]
    pub const fn new(position: Vec3) -> Self {
        Self { position, color: BLACK }
    }
}

/// Generate all `R³` sample points in lattice order, colours black.
#[tracing::instrument(skip_all, fields(resolution = params.resolution()))]
pub fn sample_points(params: &VolumeParameters) -> Vec<SamplePoint> {
    (0..params.sample_count())
        .into_par_iter()
        .map(|i| SamplePoint::new(params.position_of(params.lattice_coords(i))))
        .collect()
}
