//! Point lights.

use glam::Vec3A;
use serde::Deserialize;

use crate::material::Color;

/// Point light with no falloff.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Light {
    /// World-space position.
    pub position: Vec3A,
    /// Radiance-like intensity per channel, non-negative.
    pub intensity: Color,
}

impl Light {
    /// Create a new light.
    pub fn new(position: Vec3A, intensity: Color) -> Self {
        Self { position, intensity }
    }
}
