use clap::Parser;
use log::{error, info};

mod cli;
mod logger;
mod output;

use cli::Args;
use logger::init_logger;
use mirrorball::{Camera, CameraSettings, RenderConfig, Scene, SceneError};
use output::{save_image, send_image_to_tev};

/// Load the requested scene (or the demo scene) and apply CLI overrides.
fn load_scene(args: &Args) -> Result<(Scene, CameraSettings), SceneError> {
    let (mut scene, camera) = match &args.scene {
        Some(path) => {
            info!("Loading scene from {}", path);
            Scene::load(path)?
        }
        None => {
            info!("No scene file given, rendering the demo scene");
            Scene::demo()?
        }
    };

    if let Some(limit) = args.bounce_limit {
        scene.config = RenderConfig::new(limit, scene.config.bias)?;
        info!("Bounce limit overridden to {}", scene.config.bounce_limit);
    }

    Ok((scene, camera))
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("Mirrorball - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    let (scene, settings) = match load_scene(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Image resolution: {}x{}, samples per pixel: {}, bounce limit: {}",
        args.width, args.height, args.samples_per_pixel, scene.config.bounce_limit
    );

    let camera = Camera::new(args.width, args.height, args.samples_per_pixel, settings);
    let image = camera.render(&scene);

    // Send image to TEV if requested
    if args.tev || args.tev_address.is_some() {
        let tev_address = args.tev_address.as_deref().unwrap_or("localhost:14158");
        send_image_to_tev(&image, tev_address);
    }

    if let Err(e) = save_image(&image, &args.output) {
        error!("{}", e);
        std::process::exit(1);
    }
}
