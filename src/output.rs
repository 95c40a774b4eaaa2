//! # Output Module
//!
//! Writes rendered frames out of the process:
//! - PNG: clamped, sRGB-encoded 8-bit RGBA
//! - EXR: linear 32-bit float RGBA, untouched
//! - TEV (The EXR Viewer): live preview over TCP
//!
//! The tracer produces unclamped linear radiance; this is the only place
//! where values are clamped or gamma encoded.

use std::net::TcpStream;
use std::path::Path;

use exr::prelude::write_rgba_file;
use image::{ImageBuffer, Rgba};
use log::{debug, info, warn};
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};
use thiserror::Error;

use mirrorball::interval::Interval;
use mirrorball::Frame;

const TEV_DEFAULT_PORT: u16 = 14158;
const TEV_IMAGE_NAME: &str = "mirrorball_output";
const CHANNELS: [&str; 4] = ["R", "G", "B", "A"];

/// Failures while writing an image file
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write PNG {path}: {source}")]
    Png {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write EXR {path}: {source}")]
    Exr {
        path: String,
        #[source]
        source: exr::error::Error,
    },

    #[error("Unsupported file extension '{0}'. Only .png and .exr formats are supported.")]
    UnsupportedExtension(String),
}

/// Save to `.png` or `.exr` depending on the extension of `output_path`.
pub fn save_image(image: &Frame, output_path: &str) -> Result<(), OutputError> {
    let extension = Path::new(output_path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => save_image_as_png(image, output_path),
        "exr" => save_image_as_exr(image, output_path),
        _ => Err(OutputError::UnsupportedExtension(extension)),
    }
}

/// Linear value to an 8-bit sRGB code value, clamping to [0, 1] first.
pub fn linear_to_srgb8(linear: f32) -> u8 {
    // NaN fails every comparison and would survive clamp; map it to black.
    let linear = if linear.is_nan() { 0.0 } else { Interval::UNIT.clamp(linear) };
    let encoded = if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}

/// Save as 8-bit PNG with sRGB encoding; alpha is stored linearly.
pub fn save_image_as_png(image: &Frame, output_path: &str) -> Result<(), OutputError> {
    let (width, height) = image.dimensions();
    let u8_image: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        Rgba([
            linear_to_srgb8(r),
            linear_to_srgb8(g),
            linear_to_srgb8(b),
            (Interval::UNIT.clamp(a) * 255.0).round() as u8,
        ])
    });

    u8_image.save(output_path).map_err(|source| OutputError::Png {
        path: output_path.to_string(),
        source,
    })?;
    info!("Image saved as {}", output_path);
    Ok(())
}

/// Save as OpenEXR with full linear HDR precision.
pub fn save_image_as_exr(image: &Frame, output_path: &str) -> Result<(), OutputError> {
    let (width, height) = image.dimensions();

    write_rgba_file(output_path, width as usize, height as usize, |x, y| {
        let [r, g, b, a] = image.get_pixel(x as u32, y as u32).0;
        (r, g, b, a)
    })
    .map_err(|source| OutputError::Exr {
        path: output_path.to_string(),
        source,
    })?;
    info!("HDR image saved as EXR: {}", output_path);
    Ok(())
}

/// Send a frame to a running TEV instance.
///
/// `tev_address` is `host:port` or just `host` (port 14158). Failures are
/// logged and otherwise ignored; a missing viewer never aborts a render.
pub fn send_image_to_tev(image: &Frame, tev_address: &str) {
    let tev_address = if tev_address.contains(':') {
        tev_address.to_string()
    } else {
        format!("{}:{}", tev_address, TEV_DEFAULT_PORT)
    };

    debug!("Attempting to connect to TEV at {}", tev_address);

    let stream = match TcpStream::connect(&tev_address) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to connect to TEV on {}: {}", tev_address, e);
            return;
        }
    };
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY: {}", e);
    }
    let mut client = TevClient::wrap(stream);

    let (width, height) = image.dimensions();
    let create_packet = PacketCreateImage {
        image_name: TEV_IMAGE_NAME,
        width,
        height,
        channel_names: &CHANNELS,
        grab_focus: true,
    };
    if let Err(e) = client.send(create_packet) {
        warn!("Failed to create image in TEV: {}", e);
        return;
    }

    let planar = to_planar(image);
    let plane = u64::from(width) * u64::from(height);
    debug!("Sending {} pixels to TEV ({:.1} MB)", plane, planar.len() as f32 * 4.0 / 1_000_000.0);
    let start_time = std::time::Instant::now();

    let update_packet = PacketUpdateImage {
        image_name: TEV_IMAGE_NAME,
        grab_focus: false,
        channel_names: &CHANNELS,
        x: 0,
        y: 0,
        width,
        height,
        channel_offsets: &[0, plane, 2 * plane, 3 * plane],
        channel_strides: &[1, 1, 1, 1],
        data: &planar,
    };

    match client.send(update_packet) {
        Ok(_) => info!("Image data sent to TEV at {} in {:.2?}", tev_address, start_time.elapsed()),
        Err(e) => warn!("Failed to send image data to TEV: {}", e),
    }
}

/// Interleaved RGBA to planar RRR..GGG..BBB..AAA.. as TEV expects.
fn to_planar(image: &Frame) -> Vec<f32> {
    (0..4)
        .flat_map(|channel| image.pixels().map(move |p| p[channel]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_encoding() {
        assert_eq!(linear_to_srgb8(0.0), 0);
        assert_eq!(linear_to_srgb8(1.0), 255);
        assert_eq!(linear_to_srgb8(7.5), 255);
        assert_eq!(linear_to_srgb8(-1.0), 0);
        assert_eq!(linear_to_srgb8(f32::NAN), 0);
        // Dark linear values land much higher once encoded.
        assert_eq!(linear_to_srgb8(0.2), 124);
    }

    #[test]
    fn test_to_planar() {
        let mut frame = Frame::new(2, 1);
        frame.put_pixel(0, 0, Rgba([1.0, 2.0, 3.0, 4.0]));
        frame.put_pixel(1, 0, Rgba([5.0, 6.0, 7.0, 8.0]));
        assert_eq!(to_planar(&frame), vec![1.0, 5.0, 2.0, 6.0, 3.0, 7.0, 4.0, 8.0]);
    }

    #[test]
    fn test_unsupported_extension() {
        let frame = Frame::new(1, 1);
        assert!(matches!(
            save_image(&frame, "render.bmp"),
            Err(OutputError::UnsupportedExtension(ext)) if ext == "bmp"
        ));
    }

    #[test]
    fn test_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let path = path.to_str().unwrap();

        let mut frame = Frame::new(2, 2);
        frame.put_pixel(1, 1, Rgba([1.0, 0.0, 0.0, 1.0]));
        save_image(&frame, path).unwrap();

        let loaded = image::open(path).unwrap().into_rgba8();
        assert_eq!(loaded.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(loaded.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }
}
