//! Ray-object intersection system.
//!
//! Defines the Hittable trait for geometric primitives, HitRecord for
//! storing intersection data, and the nearest-hit query over a sphere list.

use glam::Vec3A;
use crate::ray::Ray;
use crate::interval::Interval;
use crate::material::Material;
use crate::sphere::Sphere;

/// Smallest world-space hit distance accepted by [`intersect`].
///
/// Keeps rays that start on a surface from re-hitting it at t ~ 0. Distinct
/// from the origin bias applied to shadow and reflection rays. Converted to
/// the ray's parametric units, so it holds for any direction length.
pub const HIT_EPSILON: f32 = 1e-4;

/// Ray-object intersection information.
///
/// Contains intersection point, surface normal, distance, and material data
/// needed for shading calculations.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Distance along the ray to the intersection point, in units of the
    /// ray direction
    pub t: f32,
    /// Point where the ray intersects the object
    pub p: Vec3A,
    /// Outward surface normal at the intersection point (unit vector)
    pub normal: Vec3A,
    /// Material of the object at the hit point, borrowed from the scene
    pub material: &'a Material,
}

/// Trait for objects that can be intersected by rays.
///
/// Must be thread-safe (Sync + Send) since every pixel is traced in parallel
/// against the same read-only scene.
pub trait Hittable: Sync + Send {
    /// Test for ray intersection strictly inside the given parameter range.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

/// Nearest intersection of `r` with any sphere.
///
/// Linear search; a candidate replaces the running best only if strictly
/// closer, so equal-distance ties go to the earlier sphere. Degenerate rays
/// never hit.
pub fn intersect<'a>(r: &Ray, spheres: &'a [Sphere]) -> Option<HitRecord<'a>> {
    if r.is_degenerate() {
        return None;
    }

    // t is measured in multiples of the direction vector.
    let ray_t = Interval::forward(HIT_EPSILON / r.direction.length());
    let mut closest: Option<HitRecord> = None;

    for sphere in spheres {
        let closest_so_far = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
        if let Some(rec) = sphere.hit(r, ray_t.with_max(closest_so_far)) {
            closest = Some(rec);
        }
    }

    closest
}
