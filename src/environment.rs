//! Background radiance sampled by rays that escape every sphere.
//!
//! An environment is any pure function from direction to color. Three
//! concrete maps are provided: a solid color, the classic white-to-blue sky
//! gradient, and a six-face cube map loaded from images.

use std::path::Path;

use glam::Vec3A;
use image::Rgb32FImage;
use log::debug;

use crate::error::SceneError;
use crate::material::Color;

/// Direction to background color lookup.
///
/// Must be thread-safe since every pixel samples it concurrently. `direction`
/// is not guaranteed to be normalized and may be zero for degenerate rays.
pub trait EnvironmentMap: Send + Sync {
    /// Radiance arriving from `direction`.
    fn sample(&self, direction: Vec3A) -> Color;
}

impl<F> EnvironmentMap for F
where
    F: Fn(Vec3A) -> Color + Send + Sync,
{
    fn sample(&self, direction: Vec3A) -> Color {
        self(direction)
    }
}

/// Same color in every direction.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor(pub Color);

impl EnvironmentMap for SolidColor {
    fn sample(&self, _direction: Vec3A) -> Color {
        self.0
    }
}

/// Vertical blend from `horizon` (looking down) to `zenith` (looking up).
#[derive(Debug, Clone, Copy)]
pub struct SkyGradient {
    /// Color for straight-down directions.
    pub horizon: Color,
    /// Color for straight-up directions.
    pub zenith: Color,
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            horizon: Color::new(1.0, 1.0, 1.0),
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

impl EnvironmentMap for SkyGradient {
    fn sample(&self, direction: Vec3A) -> Color {
        let unit_direction = direction.normalize_or_zero();
        // Y = -1 (down) gives a = 0, Y = 1 (up) gives a = 1
        let a = 0.5 * (unit_direction.y + 1.0);
        (1.0 - a) * self.horizon + a * self.zenith
    }
}

/// Index of each face in [`CubeMap::faces`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    /// +X
    PosX = 0,
    /// -X
    NegX = 1,
    /// +Y
    PosY = 2,
    /// -Y
    NegY = 3,
    /// +Z
    PosZ = 4,
    /// -Z
    NegZ = 5,
}

/// Six-face cube map using the OpenGL face orientation convention.
///
/// Lookups are nearest-texel. With `z_up` set, lookup directions have their
/// y and z axes swapped first, for cube maps authored with +Z as up.
pub struct CubeMap {
    faces: [Rgb32FImage; 6],
    z_up: bool,
}

impl CubeMap {
    /// Build from six face images in +X, -X, +Y, -Y, +Z, -Z order.
    pub fn new(faces: [Rgb32FImage; 6], z_up: bool) -> Self {
        Self { faces, z_up }
    }

    /// Load six face images from disk.
    ///
    /// When `linearize` is set the texels are treated as sRGB-encoded and
    /// decoded to linear radiance.
    pub fn load<P: AsRef<Path>>(paths: &[P; 6], z_up: bool, linearize: bool) -> Result<Self, SceneError> {
        let mut faces = Vec::with_capacity(6);
        for path in paths {
            let path = path.as_ref();
            let mut face = image::open(path)
                .map_err(|source| SceneError::Image {
                    path: path.to_path_buf(),
                    source,
                })?
                .into_rgb32f();
            if linearize {
                for texel in face.pixels_mut() {
                    texel.0 = texel.0.map(srgb_to_linear);
                }
            }
            debug!("Loaded cube face {} ({}x{})", path.display(), face.width(), face.height());
            faces.push(face);
        }

        let faces: [Rgb32FImage; 6] = faces
            .try_into()
            .map_err(|_| SceneError::InvalidEnvironment("cube map needs exactly six faces".into()))?;
        Ok(Self::new(faces, z_up))
    }

    /// Face and (s, t) texture coordinates in [0, 1] for a direction.
    fn project(direction: Vec3A) -> (CubeFace, f32, f32) {
        let (x, y, z) = (direction.x, direction.y, direction.z);
        let (ax, ay, az) = (x.abs(), y.abs(), z.abs());

        let (face, sc, tc, ma) = if ax >= ay && ax >= az {
            if x > 0.0 {
                (CubeFace::PosX, -z, -y, ax)
            } else {
                (CubeFace::NegX, z, -y, ax)
            }
        } else if ay >= az {
            if y > 0.0 {
                (CubeFace::PosY, x, z, ay)
            } else {
                (CubeFace::NegY, x, -z, ay)
            }
        } else if z > 0.0 {
            (CubeFace::PosZ, x, -y, az)
        } else {
            (CubeFace::NegZ, -x, -y, az)
        };

        (face, 0.5 * (sc / ma + 1.0), 0.5 * (tc / ma + 1.0))
    }
}

impl EnvironmentMap for CubeMap {
    fn sample(&self, direction: Vec3A) -> Color {
        let direction = if self.z_up {
            Vec3A::new(direction.x, direction.z, direction.y)
        } else {
            direction
        };
        if direction.length_squared() == 0.0 || !direction.is_finite() {
            return Color::ZERO;
        }

        let (face, s, t) = Self::project(direction);
        let image = &self.faces[face as usize];
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Color::ZERO;
        }

        let px = ((s * w as f32) as u32).min(w - 1);
        let py = ((t * h as f32) as u32).min(h - 1);
        let texel = image.get_pixel(px, py);
        Color::new(texel[0], texel[1], texel[2])
    }
}

/// sRGB transfer function, decode direction.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
