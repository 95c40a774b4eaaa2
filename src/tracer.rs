//! Per-ray evaluation: primary hit, direct shading, then a bounded chain of
//! mirror reflections that ends in the environment when a ray escapes.

use crate::hittable::intersect;
use crate::material::{has_energy, reflect, Color};
use crate::ray::Ray;
use crate::scene::{Scene, MAX_BOUNCES};
use crate::shading::shade;

/// Outcome of tracing one primary ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceResult {
    /// Linear, unclamped radiance.
    pub color: Color,
    /// False when the primary ray escaped to the environment (alpha 0).
    pub opaque: bool,
    /// Reflection rays cast after the primary hit.
    pub bounces: u32,
}

impl TraceResult {
    /// Color with alpha 1 for opaque results and 0 for background.
    pub fn rgba(&self) -> [f32; 4] {
        let alpha = if self.opaque { 1.0 } else { 0.0 };
        [self.color.x, self.color.y, self.color.z, alpha]
    }
}

/// Trace a primary ray through the scene.
///
/// Each reflection is weighted by the product of the specular coefficients
/// of every surface it has bounced off. The loop stops after
/// `min(bounce_limit, MAX_BOUNCES)` reflection rays, when that weight runs
/// out, or when a reflection ray escapes.
pub fn trace(primary: &Ray, scene: &Scene) -> TraceResult {
    let Some(hit) = intersect(primary, &scene.spheres) else {
        return TraceResult {
            color: scene.environment.sample(primary.direction),
            opaque: false,
            bounces: 0,
        };
    };

    let bias = scene.config.bias;
    let view = (-primary.direction).normalize();
    let mut color = shade(hit.material, hit.p, hit.normal, view, &scene.lights, &scene.spheres, bias);
    let mut weight = hit.material.specular;

    let mut current_hit = hit;
    let mut current_ray = *primary;
    let mut bounces = 0;

    for _ in 0..scene.config.bounce_limit.min(MAX_BOUNCES) {
        if !has_energy(weight) {
            break;
        }

        let reflected = Ray::new(
            current_hit.p + current_hit.normal * bias,
            reflect(current_ray.direction, current_hit.normal).normalize(),
        );
        bounces += 1;

        match intersect(&reflected, &scene.spheres) {
            Some(next) => {
                let view = -reflected.direction;
                color += weight
                    * shade(next.material, next.p, next.normal, view, &scene.lights, &scene.spheres, bias);
                weight *= next.material.specular;
                current_hit = next;
                current_ray = reflected;
            }
            None => {
                color += weight * scene.environment.sample(reflected.direction);
                break;
            }
        }
    }

    TraceResult {
        color,
        opaque: true,
        bounces,
    }
}
