//! Per-frame scene data and its on-disk description.
//!
//! A [`Scene`] is validated once when it is built and is read-only while a
//! frame renders; the tracer never re-checks it. Scenes are usually loaded
//! from a TOML file:
//!
//! ```toml
//! [render]
//! bounce_limit = 4
//!
//! [environment]
//! kind = "gradient"
//!
//! [materials.mirror]
//! diffuse = [0.05, 0.05, 0.05]
//! specular = [0.9, 0.9, 0.9]
//! shininess = 200.0
//!
//! [[spheres]]
//! center = [0.0, 0.0, -5.0]
//! radius = 1.0
//! material = "mirror"
//!
//! [[lights]]
//! position = [0.0, 5.0, 0.0]
//! intensity = [1.0, 1.0, 1.0]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec3A;
use log::debug;
use serde::Deserialize;

use crate::camera::CameraSettings;
use crate::environment::{CubeMap, EnvironmentMap, SkyGradient, SolidColor};
use crate::error::{Result, SceneError};
use crate::light::Light;
use crate::material::{Color, Material};
use crate::shading::DEFAULT_BIAS;
use crate::sphere::Sphere;

/// Hard ceiling on reflection bounces per primary ray.
pub const MAX_BOUNCES: u32 = 16;

/// Tracing parameters shared by every pixel of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Reflection bounces after the primary hit, in 0..=MAX_BOUNCES.
    pub bounce_limit: u32,
    /// Offset along the normal for shadow and reflection ray origins.
    pub bias: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bounce_limit: 4,
            bias: DEFAULT_BIAS,
        }
    }
}

impl RenderConfig {
    /// Build from a signed bounce limit as it appears in user input.
    pub fn new(bounce_limit: i64, bias: f32) -> Result<Self> {
        let limit = u32::try_from(bounce_limit)
            .ok()
            .filter(|limit| *limit <= MAX_BOUNCES)
            .ok_or(SceneError::BounceLimitOutOfRange {
                limit: bounce_limit,
                max: MAX_BOUNCES,
            })?;
        let config = Self {
            bounce_limit: limit,
            bias,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.bounce_limit > MAX_BOUNCES {
            return Err(SceneError::BounceLimitOutOfRange {
                limit: i64::from(self.bounce_limit),
                max: MAX_BOUNCES,
            });
        }
        if !(self.bias.is_finite() && self.bias > 0.0) {
            return Err(SceneError::InvalidBias(self.bias));
        }
        Ok(())
    }
}

/// Everything the tracer reads for one frame.
pub struct Scene {
    /// Spheres in tie-breaking order.
    pub spheres: Vec<Sphere>,
    /// Point lights.
    pub lights: Vec<Light>,
    /// Background for escaping rays.
    pub environment: Box<dyn EnvironmentMap>,
    /// Bounce limit and ray bias.
    pub config: RenderConfig,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("spheres", &self.spheres)
            .field("lights", &self.lights)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Validate and assemble a scene.
    ///
    /// Rejects non-positive radii, negative material coefficients or
    /// shininess, negative light intensities and out-of-range render
    /// parameters. NaN counts as out of range everywhere.
    pub fn new(
        spheres: Vec<Sphere>,
        lights: Vec<Light>,
        environment: impl EnvironmentMap + 'static,
        config: RenderConfig,
    ) -> Result<Self> {
        Self::from_boxed(spheres, lights, Box::new(environment), config)
    }

    fn from_boxed(
        spheres: Vec<Sphere>,
        lights: Vec<Light>,
        environment: Box<dyn EnvironmentMap>,
        config: RenderConfig,
    ) -> Result<Self> {
        config.validate()?;

        for (index, sphere) in spheres.iter().enumerate() {
            // Written so that NaN fails too.
            if !(sphere.radius > 0.0) {
                return Err(SceneError::NonPositiveRadius {
                    index,
                    radius: sphere.radius,
                });
            }
            validate_material(&format!("sphere {index}"), &sphere.material)?;
        }

        for (index, light) in lights.iter().enumerate() {
            if !is_non_negative(light.intensity) {
                return Err(SceneError::NegativeLightIntensity { index });
            }
        }

        debug!(
            "Scene: {} spheres ({} reflective), {} lights, bounce limit {}, bias {}",
            spheres.len(),
            spheres.iter().filter(|sphere| sphere.material.is_reflective()).count(),
            lights.len(),
            config.bounce_limit,
            config.bias
        );

        Ok(Self {
            spheres,
            lights,
            environment,
            config,
        })
    }

    /// Load a scene file. Relative image paths resolve against the file's
    /// directory.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, CameraSettings)> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let description: SceneDescription = toml::from_str(&text)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        description.build(base_dir)
    }

    /// Small scene used when no file is given: three spheres on a large
    /// ground sphere, one of them a mirror, under two lights.
    pub fn demo() -> Result<(Self, CameraSettings)> {
        let ground = Arc::new(Material::new(
            Color::new(0.4, 0.4, 0.4),
            Color::new(0.1, 0.1, 0.1),
            20.0,
        ));
        let mirror = Arc::new(Material::new(
            Color::new(0.05, 0.05, 0.05),
            Color::new(0.85, 0.85, 0.85),
            300.0,
        ));
        let red = Arc::new(Material::new(
            Color::new(0.8, 0.1, 0.1),
            Color::new(0.3, 0.3, 0.3),
            60.0,
        ));
        let blue = Arc::new(Material::new(
            Color::new(0.1, 0.2, 0.8),
            Color::new(0.2, 0.2, 0.2),
            40.0,
        ));

        let spheres = vec![
            Sphere::new(Vec3A::new(0.0, -1000.0, 0.0), 999.0, ground),
            Sphere::new(Vec3A::new(0.0, 0.0, 0.0), 1.0, mirror),
            Sphere::new(Vec3A::new(-2.2, -0.3, 0.6), 0.7, red),
            Sphere::new(Vec3A::new(2.0, -0.4, 0.8), 0.6, blue),
        ];
        let lights = vec![
            Light::new(Vec3A::new(-4.0, 6.0, 6.0), Color::splat(0.8)),
            Light::new(Vec3A::new(5.0, 4.0, 2.0), Color::new(0.5, 0.45, 0.4)),
        ];

        let scene = Self::new(spheres, lights, SkyGradient::default(), RenderConfig::default())?;
        let camera = CameraSettings {
            lookfrom: Vec3A::new(0.0, 1.0, 7.0),
            lookat: Vec3A::new(0.0, -0.2, 0.0),
            ..CameraSettings::default()
        };
        Ok((scene, camera))
    }
}

/// Every channel is `>= 0`; NaN fails.
fn is_non_negative(c: Color) -> bool {
    c.cmpge(Color::ZERO).all()
}

fn validate_material(name: &str, material: &Material) -> Result<()> {
    if !(is_non_negative(material.diffuse) && is_non_negative(material.specular)) {
        return Err(SceneError::NegativeMaterialCoefficient { name: name.to_string() });
    }
    if !(material.shininess >= 0.0) {
        return Err(SceneError::NegativeShininess {
            name: name.to_string(),
            shininess: material.shininess,
        });
    }
    Ok(())
}

/// Top-level layout of a scene file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    /// `[render]` table.
    #[serde(default)]
    pub render: RenderDescription,
    /// `[environment]` table.
    #[serde(default)]
    pub environment: EnvironmentDescription,
    /// `[materials.<name>]` tables, shared by name.
    #[serde(default)]
    pub materials: BTreeMap<String, Material>,
    /// `[[spheres]]` array.
    #[serde(default)]
    pub spheres: Vec<SphereDescription>,
    /// `[[lights]]` array.
    #[serde(default)]
    pub lights: Vec<Light>,
    /// `[camera]` table.
    #[serde(default)]
    pub camera: CameraSettings,
}

/// `[render]` table.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderDescription {
    /// Signed so that negative values can be reported instead of failing to parse.
    #[serde(default = "default_bounce_limit")]
    pub bounce_limit: i64,
    /// Shadow/reflection origin offset.
    #[serde(default = "default_bias")]
    pub bias: f32,
}

fn default_bounce_limit() -> i64 {
    i64::from(RenderConfig::default().bounce_limit)
}

fn default_bias() -> f32 {
    DEFAULT_BIAS
}

impl Default for RenderDescription {
    fn default() -> Self {
        Self {
            bounce_limit: default_bounce_limit(),
            bias: default_bias(),
        }
    }
}

/// `[[spheres]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SphereDescription {
    /// Center in world space.
    pub center: Vec3A,
    /// Radius, must be positive.
    pub radius: f32,
    /// Name of a `[materials.<name>]` table.
    pub material: String,
}

/// `[environment]` table, selected by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnvironmentDescription {
    /// Constant background.
    Solid {
        /// Background color.
        color: Color,
    },
    /// Vertical sky gradient.
    Gradient {
        /// Color looking straight down.
        #[serde(default = "default_horizon")]
        horizon: Color,
        /// Color looking straight up.
        #[serde(default = "default_zenith")]
        zenith: Color,
    },
    /// Six face images, +X, -X, +Y, -Y, +Z, -Z.
    Cube {
        /// Face image paths.
        faces: [PathBuf; 6],
        /// Treat +Z as up when looking faces up.
        #[serde(default)]
        z_up: bool,
        /// Decode sRGB texels to linear.
        #[serde(default = "default_linearize")]
        linearize: bool,
    },
}

fn default_horizon() -> Color {
    SkyGradient::default().horizon
}

fn default_zenith() -> Color {
    SkyGradient::default().zenith
}

fn default_linearize() -> bool {
    true
}

impl Default for EnvironmentDescription {
    fn default() -> Self {
        Self::Gradient {
            horizon: default_horizon(),
            zenith: default_zenith(),
        }
    }
}

impl EnvironmentDescription {
    fn build(self, base_dir: &Path) -> Result<Box<dyn EnvironmentMap>> {
        Ok(match self {
            Self::Solid { color } => Box::new(SolidColor(color)),
            Self::Gradient { horizon, zenith } => Box::new(SkyGradient { horizon, zenith }),
            Self::Cube {
                faces,
                z_up,
                linearize,
            } => {
                let faces = faces.map(|face| base_dir.join(face));
                Box::new(CubeMap::load(&faces, z_up, linearize)?)
            }
        })
    }
}

impl SceneDescription {
    /// Resolve material names, load the environment and validate.
    pub fn build(self, base_dir: &Path) -> Result<(Scene, CameraSettings)> {
        for (name, material) in &self.materials {
            validate_material(name, material)?;
        }
        let materials: BTreeMap<String, Arc<Material>> = self
            .materials
            .into_iter()
            .map(|(name, material)| (name, Arc::new(material)))
            .collect();

        let spheres = self
            .spheres
            .into_iter()
            .enumerate()
            .map(|(index, sphere)| -> Result<Sphere> {
                let material = materials.get(&sphere.material).ok_or_else(|| {
                    SceneError::UnknownMaterial {
                        sphere: index,
                        material: sphere.material.clone(),
                    }
                })?;
                Ok(Sphere::new(sphere.center, sphere.radius, Arc::clone(material)))
            })
            .collect::<Result<Vec<_>>>()?;

        let config = RenderConfig::new(self.render.bounce_limit, self.render.bias)?;
        self.camera.validate()?;
        let environment = self.environment.build(base_dir)?;
        let scene = Scene::from_boxed(spheres, self.lights, environment, config)?;
        Ok((scene, self.camera))
    }
}
