//! Local illumination: Lambertian diffuse plus Blinn-Phong specular, with a
//! binary shadow test toward every light.

use glam::Vec3A;

use crate::hittable::intersect;
use crate::light::Light;
use crate::material::{Color, Material};
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Default offset along the normal for shadow and reflection ray origins.
///
/// Too small and surfaces shadow or reflect themselves (acne); too large and
/// shadows and reflections visibly detach from their surface.
pub const DEFAULT_BIAS: f32 = 0.02;

/// Direct lighting at a surface point.
///
/// `view` is the unit vector from the point back toward the viewer. A light
/// contributes nothing if any sphere lies between the biased point and the
/// light. The result is unclamped and has no ambient term.
pub fn shade(
    material: &Material,
    position: Vec3A,
    normal: Vec3A,
    view: Vec3A,
    lights: &[Light],
    spheres: &[Sphere],
    bias: f32,
) -> Color {
    let shadow_origin = position + normal * bias;

    lights
        .iter()
        .filter(|light| !is_occluded(shadow_origin, position, light, spheres))
        .map(|light| {
            let l = (light.position - position).normalize();

            let diffuse = normal.dot(l).max(0.0) * material.diffuse;

            let h = (l + view).normalize();
            let spec = normal.dot(h).max(0.0).powf(material.shininess);
            let specular = spec * material.specular;

            (diffuse + specular) * light.intensity
        })
        .sum()
}

/// Shadow test: does anything block the segment from `position` to the light?
fn is_occluded(shadow_origin: Vec3A, position: Vec3A, light: &Light, spheres: &[Sphere]) -> bool {
    let to_light = light.position - position;
    let light_distance = to_light.length();
    let shadow_ray = Ray::new(shadow_origin, to_light.normalize());

    intersect(&shadow_ray, spheres).is_some_and(|rec| rec.t < light_distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    fn red_sphere() -> Sphere {
        Sphere::new(
            Vec3A::new(0.0, 0.0, -5.0),
            1.0,
            Arc::new(Material::new(Vec3A::X, Vec3A::ZERO, 10.0)),
        )
    }

    #[test]
    fn test_diffuse_only() {
        let s = red_sphere();
        let light = Light::new(Vec3A::new(0.0, 5.0, 0.0), Vec3A::ONE);
        let p = Vec3A::new(0.0, 0.0, -4.0);
        let n = Vec3A::Z;
        let c = shade(&s.material, p, n, Vec3A::Z, &[light], &[s.clone()], DEFAULT_BIAS);

        let expected = n.dot((light.position - p).normalize());
        assert_abs_diff_eq!(c.x, expected, epsilon = 1e-5);
        assert_eq!(c.y, 0.0);
        assert_eq!(c.z, 0.0);
    }

    #[test]
    fn test_specular_highlight_along_mirror_direction() {
        let m = Material::new(Vec3A::ZERO, Vec3A::ONE, 50.0);
        let n = Vec3A::Y;
        // Light straight above, viewer straight above: half vector equals normal.
        let light = Light::new(Vec3A::new(0.0, 10.0, 0.0), Vec3A::splat(2.0));
        let c = shade(&m, Vec3A::ZERO, n, Vec3A::Y, &[light], &[], DEFAULT_BIAS);
        assert_abs_diff_eq!(c, Vec3A::splat(2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_light_behind_surface_contributes_nothing() {
        let m = Material::new(Vec3A::ONE, Vec3A::ZERO, 1.0);
        let light = Light::new(Vec3A::new(0.0, -10.0, 0.0), Vec3A::ONE);
        let c = shade(&m, Vec3A::ZERO, Vec3A::Y, Vec3A::Y, &[light], &[], DEFAULT_BIAS);
        assert_eq!(c, Vec3A::ZERO);
    }

    #[test]
    fn test_occluder_blocks_light() {
        let s = red_sphere();
        let light = Light::new(Vec3A::new(0.0, 5.0, -5.0), Vec3A::ONE);
        let p = Vec3A::new(0.0, 1.0, -5.0);
        let blocker = Sphere::new(
            Vec3A::new(0.0, 3.0, -5.0),
            0.5,
            Arc::new(Material::matte(Vec3A::ONE)),
        );

        let lit = shade(&s.material, p, Vec3A::Y, Vec3A::Y, &[light], &[s.clone()], DEFAULT_BIAS);
        assert!(lit.x > 0.0);

        let shadowed = shade(&s.material, p, Vec3A::Y, Vec3A::Y, &[light], &[s.clone(), blocker], DEFAULT_BIAS);
        assert_eq!(shadowed, Vec3A::ZERO);
    }

    #[test]
    fn test_sphere_beyond_light_does_not_shadow() {
        let m = Material::matte(Vec3A::ONE);
        let light = Light::new(Vec3A::new(0.0, 2.0, 0.0), Vec3A::ONE);
        let beyond = Sphere::new(Vec3A::new(0.0, 6.0, 0.0), 1.0, Arc::new(m));
        let c = shade(&m, Vec3A::ZERO, Vec3A::Y, Vec3A::Y, &[light], &[beyond], DEFAULT_BIAS);
        assert_abs_diff_eq!(c, Vec3A::ONE, epsilon = 1e-5);
    }

    #[test]
    fn test_lights_accumulate() {
        let m = Material::matte(Vec3A::ONE);
        let a = Light::new(Vec3A::new(0.0, 4.0, 0.0), Vec3A::new(0.5, 0.0, 0.0));
        let b = Light::new(Vec3A::new(0.0, 4.0, 0.0), Vec3A::new(0.0, 0.25, 0.0));
        let c = shade(&m, Vec3A::ZERO, Vec3A::Y, Vec3A::Y, &[a, b], &[], DEFAULT_BIAS);
        assert_abs_diff_eq!(c, Vec3A::new(0.5, 0.25, 0.0), epsilon = 1e-5);
    }
}
