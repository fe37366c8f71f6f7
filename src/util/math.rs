//! Math type re-exports and the colour alias shared by the bake stages.
//!
//! Vectors come from `glam`; colours are plain linear RGB [`Vec3`]s.

pub use glam::{IVec3, Vec3};

/// Linear RGB colour. Alpha is implied opaque and only appears at encode time.
pub type Rgb = Vec3;

/// Pure black, the accumulator default.
pub const BLACK: Rgb = Vec3::ZERO;
