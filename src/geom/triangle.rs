//! Triangle soup primitives used for occlusion ray casts.
//!
//! Triangles are stored by value (three full vertices), so the soup keeps no
//! reference back to the mesh it was extracted from.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Determinant tolerance of the ray-triangle test: rays closer than this to
/// parallel with the triangle plane miss.
pub const RAY_EPSILON: f32 = 1e-6;

/// Deinterleaved vertex: position and normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    #[inline]
    pub const fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// One triangle of the soup.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Triangle {
    pub a: Vertex,
    pub b: Vertex,
    pub c: Vertex,
}

impl Triangle {
    #[inline]
    pub const fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self { a, b, c }
    }

    /// Triangle from bare positions, normals set to the face normal.
    pub fn from_positions(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let n = (b - a).cross(c - a).normalize_or_zero();
        Self {
            a: Vertex::new(a, n),
            b: Vertex::new(b, n),
            c: Vertex::new(c, n),
        }
    }

    /// Distance along `dir` from `origin` to this triangle, if the ray hits it.
    ///
    /// Moller-Trumbore, two-sided. `dir` is expected to be normalized, which
    /// makes the returned parameter a world-space distance. Barycentric bounds
    /// are inclusive, so a ray through an edge or vertex counts as a hit.
    /// Any hit at or ahead of the origin counts, including `t = 0` for an
    /// origin lying on the triangle.
    #[inline]
    pub fn intersect_ray(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let v0 = self.a.position;
        let e1 = self.b.position - v0;
        let e2 = self.c.position - v0;

        let pvec = dir.cross(e2);
        let det = e1.dot(pvec);
        if det.abs() < RAY_EPSILON {
            return None;
        }

        let tvec = origin - v0;
        let u = tvec.dot(pvec) / det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(e1);
        let v = dir.dot(qvec) / det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(qvec) / det;
        (t >= 0.0).then_some(t)
    }
}

/// Closest hit distance of a ray against a triangle soup (brute force).
pub fn closest_hit(triangles: &[Triangle], origin: Vec3, dir: Vec3) -> Option<f32> {
    triangles
        .iter()
        .filter_map(|tri| tri.intersect_ray(origin, dir))
        .fold(None, |best, t| match best {
            Some(b) if b <= t => Some(b),
            _ => Some(t),
        })
}
