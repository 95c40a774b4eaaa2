//! Ray representation for 3D ray tracing.
//!
//! A ray is defined as r(t) = origin + t * direction, representing a semi-infinite
//! line in 3D space used for intersection testing.

use glam::Vec3A;

/// Ray in 3D space defined by origin and direction.
///
/// Mathematical representation: r(t) = origin + t * direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    ///
    /// The camera position for primary rays, or a biased surface point for
    /// shadow and reflection rays.
    pub origin: Vec3A,

    /// Direction vector of the ray.
    ///
    /// Callers need not normalize it. Hit distances are expressed in units of
    /// this vector, so they are world distances only for unit directions.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a new ray with origin and direction.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self { origin, direction }
    }

    /// Compute a point at parameter t along the ray.
    ///
    /// Returns r(t) = origin + t * direction.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }

    /// True when the direction has zero length (or is not finite), which would
    /// zero the leading coefficient of the sphere quadratic.
    pub fn is_degenerate(&self) -> bool {
        let len2 = self.direction.length_squared();
        !(len2 > 0.0 && len2.is_finite())
    }
}
