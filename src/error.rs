//! Error types for scene construction and loading.
//!
//! Tracing itself cannot fail; every error here is raised while a scene is
//! being assembled, before any pixel is rendered.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Sphere radius is zero, negative or not a number
    #[error("Sphere {index} has non-positive radius {radius}")]
    NonPositiveRadius {
        /// Position of the sphere in the scene's list
        index: usize,
        /// Rejected radius
        radius: f32,
    },

    /// Diffuse or specular coefficient has a negative or NaN channel
    #[error("Material '{name}' has a negative or NaN diffuse or specular coefficient")]
    NegativeMaterialCoefficient {
        /// Material name, or `sphere <index>` for materials built in code
        name: String,
    },

    /// Specular exponent below zero or NaN
    #[error("Material '{name}' has invalid shininess {shininess}")]
    NegativeShininess {
        /// Material name, or `sphere <index>` for materials built in code
        name: String,
        /// Rejected exponent
        shininess: f32,
    },

    /// Light intensity has a negative or NaN channel
    #[error("Light {index} has a negative or NaN intensity component")]
    NegativeLightIntensity {
        /// Position of the light in the scene's list
        index: usize,
    },

    /// Bounce limit outside [0, MAX_BOUNCES]
    #[error("Bounce limit {limit} outside the supported range 0..={max}")]
    BounceLimitOutOfRange {
        /// Requested limit, as given
        limit: i64,
        /// Hard ceiling
        max: u32,
    },

    /// Shadow/reflection bias must be finite and positive
    #[error("Ray bias must be finite and positive, got {0}")]
    InvalidBias(f32),

    /// Sphere refers to a material name that was never defined
    #[error("Sphere {sphere} refers to unknown material '{material}'")]
    UnknownMaterial {
        /// Position of the sphere in the file's `[[spheres]]` array
        sphere: usize,
        /// Material name that was not found
        material: String,
    },

    /// Camera placement does not define a view basis
    #[error("Invalid camera: {0}")]
    InvalidCamera(&'static str),

    /// Environment description could not be turned into a map
    #[error("Invalid environment: {0}")]
    InvalidEnvironment(String),

    /// Scene file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Scene file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Scene file is not valid TOML or does not match the schema
    #[error("Failed to parse scene: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment image could not be decoded
    #[error("Failed to load image {path}: {source}")]
    Image {
        /// Face image path
        path: PathBuf,
        /// Decoder error
        #[source]
        source: image::ImageError,
    },
}

/// Result alias for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
