//! Volume parameters: where the lattice sits and how dense it is.

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::util::{Error, Result};

/// Origin, cell size and edge resolution of a cubic sample lattice.
///
/// Only constructible through [`VolumeParameters::new`], which enforces an
/// even, non-zero resolution and strictly positive, finite step sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawVolumeParameters", into = "RawVolumeParameters")]
pub struct VolumeParameters {
    origin: Vec3,
    step_size: Vec3,
    resolution: u32,
}

impl VolumeParameters {
    pub fn new(origin: Vec3, step_size: Vec3, resolution: u32) -> Result<Self> {
        if resolution == 0 {
            return Err(Error::invalid("resolution must be greater than zero"));
        }
        if resolution % 2 != 0 {
            return Err(Error::invalid(format!("resolution {resolution} must be even")));
        }
        if !origin.is_finite() {
            return Err(Error::invalid(format!("origin {origin} is not finite")));
        }
        if !step_size.is_finite() || step_size.min_element() <= 0.0 {
            return Err(Error::invalid(format!("step size {step_size} must be finite and positive")));
        }
        // Keep R^3 * 4 addressable
        let bytes = (resolution as u64)
            .checked_pow(3)
            .and_then(|n| n.checked_mul(4))
            .and_then(|n| usize::try_from(n).ok());
        if bytes.is_none() {
            return Err(Error::invalid(format!("resolution {resolution} is too large")));
        }
        Ok(Self { origin, step_size, resolution })
    }

    /// World-space centre of the lattice.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// World units per lattice cell, per axis.
    #[inline]
    pub fn step_size(&self) -> Vec3 {
        self.step_size
    }

    /// Edge length of the cubic lattice in cells.
    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Half the lattice edge, in cells.
    #[inline]
    pub fn half_resolution(&self) -> i32 {
        (self.resolution / 2) as i32
    }

    /// Half-size of the covered box: `(resolution / 2) * step_size`.
    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.step_size * self.half_resolution() as f32
    }

    /// Total number of samples, `resolution³`.
    #[inline]
    pub fn sample_count(&self) -> usize {
        let r = self.resolution as usize;
        r * r * r
    }

    /// Size of the encoded RGBA8 volume in bytes.
    #[inline]
    pub fn texel_bytes(&self) -> usize {
        self.sample_count() * 4
    }

    /// Flat sample index of zero-based lattice coordinates.
    ///
    /// Order is x outermost, then y, then z innermost:
    /// `index = (ix * R + iy) * R + iz`.
    #[inline]
    pub fn index_of(&self, ix: u32, iy: u32, iz: u32) -> usize {
        let r = self.resolution as usize;
        (ix as usize * r + iy as usize) * r + iz as usize
    }

    /// Signed lattice coordinates (each in `[-R/2, R/2)`) of a flat index.
    #[inline]
    pub fn lattice_coords(&self, index: usize) -> IVec3 {
        let r = self.resolution as usize;
        let h = self.half_resolution();
        let iz = (index % r) as i32;
        let iy = ((index / r) % r) as i32;
        let ix = (index / (r * r)) as i32;
        IVec3::new(ix - h, iy - h, iz - h)
    }

    /// World position of signed lattice coordinates.
    #[inline]
    pub fn position_of(&self, coords: IVec3) -> Vec3 {
        coords.as_vec3() * self.step_size + self.origin
    }
}

/// Unvalidated mirror used for (de)serialization.
#[derive(Serialize, Deserialize)]
struct RawVolumeParameters {
    origin: Vec3,
    step_size: Vec3,
    resolution: u32,
}

impl TryFrom<RawVolumeParameters> for VolumeParameters {
    type Error = Error;

    fn try_from(raw: RawVolumeParameters) -> Result<Self> {
        Self::new(raw.origin, raw.step_size, raw.resolution)
    }
}

impl From<VolumeParameters> for RawVolumeParameters {
    fn from(p: VolumeParameters) -> Self {
        Self {
            origin: p.origin,
            step_size: p.step_size,
            resolution: p.resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_resolution_rejected() {
        let err = VolumeParameters::new(Vec3::ZERO, Vec3::ONE, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_odd_resolution_rejected() {
        assert!(VolumeParameters::new(Vec3::ZERO, Vec3::ONE, 3).is_err());
    }

    #[test]
    fn test_step_must_be_positive() {
        assert!(VolumeParameters::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0), 2).is_err());
        assert!(VolumeParameters::new(Vec3::ZERO, Vec3::new(1.0, -1.0, 1.0), 2).is_err());
        assert!(VolumeParameters::new(Vec3::ZERO, Vec3::new(1.0, f32::NAN, 1.0), 2).is_err());
    }

    #[test]
    fn test_extents() {
        let p = VolumeParameters::new(Vec3::ZERO, Vec3::new(0.5, 1.0, 2.0), 8).unwrap();
        assert_eq!(p.extents(), Vec3::new(2.0, 4.0, 8.0));
        assert_eq!(p.sample_count(), 512);
        assert_eq!(p.texel_bytes(), 2048);
    }

    #[test]
    fn test_index_coords_agree() {
        let p = VolumeParameters::new(Vec3::ZERO, Vec3::ONE, 4).unwrap();
        assert_eq!(p.index_of(0, 0, 0), 0);
        assert_eq!(p.index_of(0, 0, 1), 1);
        assert_eq!(p.index_of(0, 1, 0), 4);
        assert_eq!(p.index_of(1, 0, 0), 16);
        assert_eq!(p.lattice_coords(0), IVec3::splat(-2));
        assert_eq!(p.lattice_coords(p.index_of(3, 2, 1)), IVec3::new(1, 0, -1));
    }

    #[test]
    fn test_serde_validates() {
        let ok: VolumeParameters =
            serde_json::from_str(r#"{"origin":[0,0,0],"step_size":[1,1,1],"resolution":4}"#).unwrap();
        assert_eq!(ok.resolution(), 4);
        let bad = serde_json::from_str::<VolumeParameters>(
            r#"{"origin":[0,0,0],"step_size":[1,1,1],"resolution":5}"#,
        );
        assert!(bad.is_err());
    }
}
