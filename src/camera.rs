//! Camera for primary ray generation and frame rendering

use glam::Vec3A;
use image::{ImageBuffer, Rgba};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;
use serde::Deserialize;

use crate::error::{Result, SceneError};
use crate::material::Color;
use crate::random;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::tracer::trace;

/// Linear RGBA frame, alpha is the opaque fraction of each pixel's samples.
pub type Frame = ImageBuffer<Rgba<f32>, Vec<f32>>;

/// Placement of the camera, as read from the `[camera]` table of a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraSettings {
    /// Point camera is looking from (camera position)
    pub lookfrom: Vec3A,
    /// Point camera is looking at (look target)
    pub lookat: Vec3A,
    /// Camera-relative "up" direction vector
    pub vup: Vec3A,
    /// Vertical field of view in degrees
    pub vfov: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            lookfrom: Vec3A::new(0.0, 0.0, 0.0),
            lookat: Vec3A::new(0.0, 0.0, -1.0),
            vup: Vec3A::new(0.0, 1.0, 0.0),
            vfov: 60.0,
        }
    }
}

impl CameraSettings {
    /// Reject placements that leave the camera basis undefined, which would
    /// turn every primary ray into NaN.
    pub fn validate(&self) -> Result<()> {
        if !(self.lookfrom.is_finite() && self.lookat.is_finite() && self.vup.is_finite()) {
            return Err(SceneError::InvalidCamera("lookfrom, lookat and vup must be finite"));
        }
        let Some(w) = (self.lookfrom - self.lookat).try_normalize() else {
            return Err(SceneError::InvalidCamera("lookfrom and lookat coincide"));
        };
        if self.vup.cross(w).try_normalize().is_none() {
            return Err(SceneError::InvalidCamera("vup is zero or parallel to the view direction"));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(SceneError::InvalidCamera("vfov must lie strictly between 0 and 180 degrees"));
        }
        Ok(())
    }
}

/// Pinhole camera producing primary rays and rendering frames.
///
/// With one sample per pixel every ray passes through the pixel center;
/// with more, samples are jittered uniformly inside the pixel.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Rendered image width in pixel count
    pub image_width: u32,
    /// Rendered image height in pixel count
    pub image_height: u32,
    /// Number of samples for each pixel (for anti-aliasing)
    pub samples_per_pixel: u32,
    /// Position and orientation
    pub settings: CameraSettings,

    /// Camera position in world space (same as lookfrom)
    center: Vec3A,
    /// World position of the top-left pixel center (pixel 0,0)
    pixel00_loc: Vec3A,
    /// Offset vector from pixel to pixel horizontally (right direction)
    pixel_delta_u: Vec3A,
    /// Offset vector from pixel to pixel vertically (down direction)
    pixel_delta_v: Vec3A,
}

impl Camera {
    /// Creates a camera and computes its viewport.
    pub fn new(image_width: u32, image_height: u32, samples_per_pixel: u32, settings: CameraSettings) -> Self {
        let mut camera = Self {
            image_width: image_width.max(1),
            image_height: image_height.max(1),
            samples_per_pixel: samples_per_pixel.max(1),
            settings,
            center: Vec3A::ZERO,
            pixel00_loc: Vec3A::ZERO,
            pixel_delta_u: Vec3A::ZERO,
            pixel_delta_v: Vec3A::ZERO,
        };
        camera.initialize();
        camera
    }

    /// Set up the camera coordinate system and a viewport one unit in front
    /// of the eye.
    fn initialize(&mut self) {
        let CameraSettings { lookfrom, lookat, vup, vfov } = self.settings;
        self.center = lookfrom;

        // Determine viewport dimensions
        let h = (vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate the u,v,w unit basis vectors for the camera coordinate frame
        let w = (lookfrom - lookat).normalize(); // Points opposite view direction
        let u = vup.cross(w).normalize(); // Points to camera right
        let v = w.cross(u); // Points to camera up

        // Calculate the vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left = self.center - w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);
    }

    /// Primary ray through pixel (i, j) offset by (dx, dy) pixels from its
    /// center. The direction is left unnormalized.
    pub fn ray_through(&self, i: u32, j: u32, dx: f32, dy: f32) -> Ray {
        let pixel_sample = self.pixel00_loc
            + ((i as f32 + dx) * self.pixel_delta_u)
            + ((j as f32 + dy) * self.pixel_delta_v);
        Ray::new(self.center, pixel_sample - self.center)
    }

    /// Generate the ray for one sample of pixel (i, j).
    fn get_ray(&self, i: u32, j: u32) -> Ray {
        if self.samples_per_pixel == 1 {
            return self.ray_through(i, j, 0.0, 0.0);
        }
        let (dx, dy) = random::sample_square();
        self.ray_through(i, j, dx, dy)
    }

    /// Averaged RGBA for one pixel.
    pub fn render_pixel(&self, scene: &Scene, i: u32, j: u32) -> [f32; 4] {
        let mut color = Color::ZERO;
        let mut alpha = 0.0;

        for _sample in 0..self.samples_per_pixel {
            let result = trace(&self.get_ray(i, j), scene);
            color += result.color;
            alpha += result.rgba()[3];
        }

        let scale = 1.0 / self.samples_per_pixel as f32;
        color *= scale;
        [color.x, color.y, color.z, alpha * scale]
    }

    /// Renders the scene on all CPU cores.
    ///
    /// Rows are independent tasks writing disjoint slices of the frame; the
    /// scene is shared read-only.
    pub fn render(&self, scene: &Scene) -> Frame {
        let mut image = Frame::new(self.image_width, self.image_height);

        info!("Generating image using {} CPU cores...", rayon::current_num_threads());
        let generation_start = std::time::Instant::now();
        let pb = ProgressBar::new(u64::from(self.image_height));
        if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows ETA: {eta}") {
            pb.set_style(style);
        }

        let row_len = self.image_width as usize * 4;
        image
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(j, row)| {
                for (i, pixel) in row.chunks_exact_mut(4).enumerate() {
                    pixel.copy_from_slice(&self.render_pixel(scene, i as u32, j as u32));
                }
                pb.inc(1);
            });

        pb.finish();
        info!("Image generated in {:.2?}", generation_start.elapsed());

        image
    }
}
