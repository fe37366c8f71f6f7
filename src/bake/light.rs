//! Point lights supplied per bake call.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::util::Rgb;

/// World-space point light with a linear RGB colour in unit range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    pub color: Rgb,
}

impl Light {
    #[inline]
    pub const fn new(position: Vec3, color: Rgb) -> Self {
        Self { position, color }
    }
}
