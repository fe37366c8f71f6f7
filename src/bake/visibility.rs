//! Per-sample direct light visibility.
//!
//! For every sample and light a shadow ray is tested against the whole
//! triangle soup (brute force). Visible lights fall off with the inverse
//! square of their distance; occluded lights contribute black.
//!
//! Lights are merged sequentially: the first light seeds the accumulator and
//! every following light is blended in with `lerp(acc, next, 0.5)`. This is
//! not an average (the k-th light weighs `0.5^k` relative to the first) and
//! is kept as-is so existing bakes stay reproducible.

use glam::Vec3;
use rayon::prelude::*;

use super::lattice::SamplePoint;
use super::light::Light;
use crate::geom::{closest_hit, Triangle};
use crate::util::{Rgb, BLACK};

/// Blend factor for each light after the first.
pub const LIGHT_BLEND: f32 = 0.5;

/// Colour contributed by one light at `point`.
///
/// Black when the closest triangle along the ray toward the light lies
/// strictly nearer than the light itself. A hit at exactly the light's
/// distance does not occlude. No clamping: very close lights may exceed 1.
pub fn light_influence(point: Vec3, triangles: &[Triangle], light: &Light) -> Rgb {
    let to_light = light.position - point;
    let distance = to_light.length();

    let dir = to_light.normalize_or_zero();
    if dir != Vec3::ZERO {
        if let Some(hit) = closest_hit(triangles, point, dir) {
            if hit < distance {
                return BLACK;
            }
        }
    }

    let attenuation = 1.0 / (distance * distance);
    light.color * attenuation
}

/// Merged colour of all lights at `point`, in light order. Black without lights.
pub fn sample_visibility(point: Vec3, lights: &[Light], triangles: &[Triangle]) -> Rgb {
    let mut contributions = lights.iter().map(|l| light_influence(point, triangles, l));
    let Some(first) = contributions.next() else {
        return BLACK;
    };
    contributions.fold(first, |acc, next| acc.lerp(next, LIGHT_BLEND))
}

/// Evaluate every sample in place, parallel over samples.
///
/// Each sample is computed independently and sequentially over lights, so
/// the result does not depend on how many threads run.
#[tracing::instrument(skip_all, fields(samples = samples.len(), lights = lights.len(), tris = triangles.len()))]
pub fn evaluate(samples: &mut [SamplePoint], lights: &[Light], triangles: &[Triangle]) {
    samples.par_iter_mut().for_each(|s| {
        s.color = sample_visibility(s.position, lights, triangles);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = Vec3::ONE;
    const RED: Rgb = Vec3::X;
    const GREEN: Rgb = Vec3::Y;
    const BLUE: Rgb = Vec3::Z;

    /// Large horizontal triangle at height `y`; covers (-1, y, -1).
    fn plate(y: f32) -> Triangle {
        Triangle::from_positions(
            Vec3::new(-2.0, y, -2.0),
            Vec3::new(2.0, y, -2.0),
            Vec3::new(-2.0, y, 2.0),
        )
    }

    const P: Vec3 = Vec3::new(-1.0, 0.0, -1.0);

    fn evaluate_serial(samples: &mut [SamplePoint], lights: &[Light], triangles: &[Triangle]) {
        for s in samples.iter_mut() {
            s.color = sample_visibility(s.position, lights, triangles);
        }
    }

    #[test]
    fn test_occluded_is_black() {
        let light = Light::new(Vec3::new(-1.0, 3.0, -1.0), WHITE);
        assert_eq!(light_influence(P, &[plate(1.0)], &light), BLACK);
    }

    #[test]
    fn test_light_on_triangle_is_visible() {
        // Hit distance equals light distance: not strictly less, so visible
        let light = Light::new(Vec3::new(-1.0, 1.0, -1.0), WHITE);
        assert_eq!(light_influence(P, &[plate(1.0)], &light), WHITE);
    }

    #[test]
    fn test_triangle_behind_light_does_not_occlude() {
        let light = Light::new(Vec3::new(-1.0, 0.5, -1.0), WHITE);
        assert_eq!(light_influence(P, &[plate(1.0)], &light), WHITE * 4.0);
    }

    #[test]
    fn test_sample_on_surface_is_occluded() {
        // P lies on plate(0): hit at t = 0, light 3 units away
        let light = Light::new(Vec3::new(-1.0, 3.0, -1.0), WHITE);
        assert_eq!(light_influence(P, &[plate(0.0)], &light), BLACK);
    }

    #[test]
    fn test_surface_just_below_sample_occludes() {
        let light = Light::new(Vec3::new(-1.0, -3.0, -1.0), WHITE);
        let above = P + Vec3::Y * 5e-7;
        assert_eq!(light_influence(above, &[plate(0.0)], &light), BLACK);
        // Same light without the plate is lit
        assert!(light_influence(above, &[], &light).x > 0.1);
    }

    #[test]
    fn test_inverse_square() {
        let color = Vec3::new(1.0, 0.5, 0.25);
        let near = Light::new(P + Vec3::Y, color);
        let far = Light::new(P + Vec3::Y * 2.0, color);
        assert_eq!(light_influence(P, &[], &near), color);
        assert_eq!(light_influence(P, &[], &far), color / 4.0);
    }

    #[test]
    fn test_no_lights_is_black() {
        assert_eq!(sample_visibility(P, &[], &[plate(1.0)]), BLACK);
    }

    #[test]
    fn test_single_light_unblended() {
        let l = Light::new(P + Vec3::X, GREEN);
        assert_eq!(sample_visibility(P, &[l], &[]), GREEN);
    }

    #[test]
    fn test_blend_is_order_dependent() {
        let at = |c| Light::new(P + Vec3::Y, c);
        let forward = sample_visibility(P, &[at(RED), at(GREEN), at(BLUE)], &[]);
        let reverse = sample_visibility(P, &[at(BLUE), at(GREEN), at(RED)], &[]);
        assert_eq!(forward, Vec3::new(0.25, 0.25, 0.5));
        assert_eq!(reverse, Vec3::new(0.5, 0.25, 0.25));
        assert_ne!(forward, reverse);
    }

    #[test]
    fn test_occluded_light_still_blends() {
        let lit = Light::new(P - Vec3::Y, RED);
        let blocked = Light::new(P + Vec3::Y * 3.0, GREEN);
        let c = sample_visibility(P, &[lit, blocked], &[plate(1.0)]);
        assert_eq!(c, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_light_at_sample_is_not_occluded() {
        let light = Light::new(P, WHITE);
        let c = light_influence(P, &[plate(0.0)], &light);
        assert!(c.x.is_infinite());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let tris = [plate(1.0), plate(-0.5)];
        let lights = [
            Light::new(Vec3::new(0.3, 2.0, -0.2), Vec3::new(1.0, 0.8, 0.6)),
            Light::new(Vec3::new(-1.5, -1.0, 0.7), Vec3::new(0.2, 0.4, 1.0)),
        ];
        let mut a: Vec<SamplePoint> = (0..200)
            .map(|i| SamplePoint::new(Vec3::new(i as f32 * 0.013 - 1.3, (i % 7) as f32 * 0.3 - 1.0, 0.1)))
            .collect();
        let mut b = a.clone();
        evaluate(&mut a, &lights, &tris);
        evaluate_serial(&mut b, &lights, &tris);
        assert_eq!(a, b);
    }
}
