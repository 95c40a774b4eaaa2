//! Sphere primitive for ray tracing.
//!
//! Ray-sphere intersection via the full quadratic formula.

use std::sync::Arc;

use glam::Vec3A;
use crate::ray::Ray;
use crate::hittable::{Hittable, HitRecord};
use crate::interval::Interval;
use crate::material::Material;

/// Sphere primitive defined by center, radius, and material.
///
/// The material is reference counted so several spheres can share one.
#[derive(Debug, Clone)]
pub struct Sphere {
    /// Center point of the sphere in world coordinates.
    pub center: Vec3A,

    /// Radius of the sphere. Must be positive; enforced by `Scene::new`.
    pub radius: f32,

    /// Material properties determining light interaction.
    pub material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3A, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Smallest root of the ray-sphere quadratic inside `ray_t`, if any.
    ///
    /// The near root is preferred; the far root is used when the near one is
    /// rejected, which happens when the origin lies inside the sphere.
    pub fn nearest_root(&self, r: &Ray, ray_t: Interval) -> Option<f32> {
        let oc = r.origin - self.center;

        let a = r.direction.dot(r.direction);
        let b = 2.0 * oc.dot(r.direction);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let t1 = (-b - sqrtd) / (2.0 * a);
        let t2 = (-b + sqrtd) / (2.0 * a);

        if ray_t.surrounds(t1) {
            Some(t1)
        } else if ray_t.surrounds(t2) {
            Some(t2)
        } else {
            None
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if r.is_degenerate() {
            return None;
        }

        let t = self.nearest_root(r, ray_t)?;
        let p = r.at(t);

        Some(HitRecord {
            t,
            p,
            normal: (p - self.center).normalize(),
            material: &self.material,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_sphere_at(center: Vec3A) -> Sphere {
        Sphere::new(center, 1.0, Arc::new(Material::matte(Vec3A::ONE)))
    }

    #[test]
    fn test_hit_from_outside_takes_near_root() {
        let s = unit_sphere_at(Vec3A::new(0.0, 0.0, -5.0));
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));
        let rec = s.hit(&r, Interval::forward(1e-4)).unwrap();
        assert_abs_diff_eq!(rec.t, 4.0, epsilon = 1e-5);
        assert_abs_diff_eq!(rec.normal.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_hit_from_inside_takes_far_root() {
        let s = unit_sphere_at(Vec3A::ZERO);
        let r = Ray::new(Vec3A::ZERO, Vec3A::X);
        let rec = s.hit(&r, Interval::forward(1e-4)).unwrap();
        assert_abs_diff_eq!(rec.t, 1.0, epsilon = 1e-5);
        // Outward normal, not flipped toward the ray.
        assert_abs_diff_eq!(rec.normal.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_unnormalized_direction_scales_t() {
        let s = unit_sphere_at(Vec3A::new(0.0, 0.0, -5.0));
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -2.0));
        let rec = s.hit(&r, Interval::forward(1e-4)).unwrap();
        assert_abs_diff_eq!(rec.t, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(rec.p.z, -4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_miss_and_behind() {
        let s = unit_sphere_at(Vec3A::new(0.0, 0.0, -5.0));
        let aside = Ray::new(Vec3A::ZERO, Vec3A::new(1.0, 0.0, 0.0));
        assert!(s.hit(&aside, Interval::forward(1e-4)).is_none());
        let away = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, 1.0));
        assert!(s.hit(&away, Interval::forward(1e-4)).is_none());
    }

    #[test]
    fn test_zero_direction_is_a_miss() {
        let s = unit_sphere_at(Vec3A::ZERO);
        let r = Ray::new(Vec3A::new(0.0, 0.0, 5.0), Vec3A::ZERO);
        assert!(s.hit(&r, Interval::forward(1e-4)).is_none());
    }

    #[test]
    fn test_origin_on_surface_rejects_zero_root() {
        let s = unit_sphere_at(Vec3A::ZERO);
        // Starting on the surface and leaving: only the t = 0 root exists.
        let r = Ray::new(Vec3A::new(0.0, 0.0, 1.0), Vec3A::Z);
        assert!(s.hit(&r, Interval::forward(1e-4)).is_none());
    }
}
