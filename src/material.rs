//! Surface materials for Blinn-Phong shading.
//!
//! A material carries a diffuse coefficient, a specular coefficient and a
//! shininess exponent. The specular coefficient doubles as the mirror
//! reflectance used by the reflection loop.

use glam::Vec3A;
use serde::Deserialize;

/// RGB color type using Vec3A for SIMD optimization.
///
/// Colors are linear radiance and are never clamped inside the tracer.
pub type Color = Vec3A;

/// Blinn-Phong material.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Material {
    /// Diffuse coefficient (k_d), per channel, non-negative.
    pub diffuse: Color,

    /// Specular coefficient (k_s), per channel, non-negative.
    ///
    /// Also attenuates every reflection bounce leaving this surface.
    #[serde(default)]
    pub specular: Color,

    /// Specular exponent (n), non-negative.
    #[serde(default = "default_shininess")]
    pub shininess: f32,
}

fn default_shininess() -> f32 {
    1.0
}

impl Material {
    /// Create a new material.
    pub fn new(diffuse: Color, specular: Color, shininess: f32) -> Self {
        Self {
            diffuse,
            specular,
            shininess,
        }
    }

    /// Purely diffuse material with no highlight and no reflection.
    pub fn matte(diffuse: Color) -> Self {
        Self::new(diffuse, Color::ZERO, 1.0)
    }

    /// True if reflection rays leaving this surface can carry energy.
    pub fn is_reflective(&self) -> bool {
        has_energy(self.specular)
    }
}

/// True if the channel sum of `c` is positive.
pub fn has_energy(c: Color) -> bool {
    c.x + c.y + c.z > 0.0
}

/// Reflect a vector off a surface using the law of reflection.
pub fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect() {
        let d = Vec3A::new(1.0, -1.0, 0.0);
        let n = Vec3A::Y;
        assert_eq!(reflect(d, n), Vec3A::new(1.0, 1.0, 0.0));
        // Grazing directions pass through unchanged.
        assert_eq!(reflect(Vec3A::X, n), Vec3A::X);
    }

    #[test]
    fn test_is_reflective() {
        assert!(!Material::matte(Color::ONE).is_reflective());
        assert!(Material::new(Color::ZERO, Color::new(0.0, 0.1, 0.0), 8.0).is_reflective());
    }
}
