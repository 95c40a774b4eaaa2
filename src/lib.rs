//! Mirrorball ray tracer
//!
//! Traces rays against a small set of analytic spheres lit by point lights:
//! Blinn-Phong direct lighting with hard shadows, followed by a bounded
//! chain of mirror reflections that falls back to an environment map when a
//! ray escapes. Frames are rendered in parallel, one row per task.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod ray;
pub mod interval;
pub mod material;
pub mod sphere;
pub mod light;
pub mod hittable;
pub mod shading;
pub mod tracer;
pub mod environment;
pub mod scene;
pub mod camera;
pub mod random;
pub mod error;

pub use camera::{Camera, CameraSettings, Frame};
pub use environment::{CubeMap, EnvironmentMap, SkyGradient, SolidColor};
pub use error::SceneError;
pub use hittable::{intersect, HitRecord, HIT_EPSILON};
pub use light::Light;
pub use material::{Color, Material};
pub use ray::Ray;
pub use scene::{RenderConfig, Scene, MAX_BOUNCES};
pub use shading::{shade, DEFAULT_BIAS};
pub use sphere::Sphere;
pub use tracer::{trace, TraceResult};
