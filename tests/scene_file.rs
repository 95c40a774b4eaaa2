use std::fs;
use std::path::Path;

use approx::assert_abs_diff_eq;
use glam::Vec3A;
use image::{Rgb, RgbImage};
use mirrorball::{trace, Color, Ray, Scene, SceneError, MAX_BOUNCES};

const MIRROR_ROOM: &str = r#"
[render]
bounce_limit = 3
bias = 0.05

[environment]
kind = "cube"
faces = ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"]
linearize = false

[materials.chrome]
diffuse = [0.0, 0.0, 0.0]
specular = [0.5, 0.5, 0.5]
shininess = 80.0

[[spheres]]
center = [0.0, 0.0, -5.0]
radius = 1.0
material = "chrome"

[camera]
lookfrom = [0.0, 0.0, 0.0]
lookat = [0.0, 0.0, -1.0]
vfov = 45.0
"#;

fn write_faces(dir: &Path) {
    let names = ["px", "nx", "py", "ny", "pz", "nz"];
    for (index, name) in names.iter().enumerate() {
        let value = (index as u8) * 40;
        let face = RgbImage::from_pixel(2, 2, Rgb([value, value, value]));
        face.save(dir.join(format!("{name}.png"))).unwrap();
    }
}

#[test]
fn loads_cube_environment_relative_to_scene_file() {
    let dir = tempfile::tempdir().unwrap();
    write_faces(dir.path());
    let scene_path = dir.path().join("room.toml");
    fs::write(&scene_path, MIRROR_ROOM).unwrap();

    let (scene, camera) = Scene::load(&scene_path).unwrap();
    assert_eq!(scene.config.bounce_limit, 3);
    assert_eq!(scene.config.bias, 0.05);
    assert_eq!(camera.vfov, 45.0);

    // Escaping toward +Z samples the +Z face (index 4).
    let face_pz = Color::splat(160.0 / 255.0);
    let escaped = trace(&Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, 1.0)), &scene);
    assert!(!escaped.opaque);
    assert_abs_diff_eq!(escaped.color, face_pz, epsilon = 1e-6);

    // Hitting the chrome sphere reflects straight back out along +Z.
    let hit = trace(&Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0)), &scene);
    assert!(hit.opaque);
    assert_eq!(hit.bounces, 1);
    assert_abs_diff_eq!(hit.color, 0.5 * face_pz, epsilon = 1e-6);
}

#[test]
fn missing_scene_file_is_an_io_error() {
    let err = Scene::load("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, SceneError::Io { .. }));
}

#[test]
fn malformed_scene_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let scene_path = dir.path().join("bad.toml");
    fs::write(&scene_path, "[[spheres]]\ncenter = \"origin\"\n").unwrap();
    assert!(matches!(Scene::load(&scene_path), Err(SceneError::Parse(_))));
}

#[test]
fn missing_cube_face_is_an_image_error() {
    let dir = tempfile::tempdir().unwrap();
    let scene_path = dir.path().join("room.toml");
    fs::write(&scene_path, MIRROR_ROOM).unwrap();
    assert!(matches!(Scene::load(&scene_path), Err(SceneError::Image { .. })));
}

#[test]
fn bounce_limit_above_ceiling_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let scene_path = dir.path().join("deep.toml");
    fs::write(&scene_path, format!("[render]\nbounce_limit = {}\n", MAX_BOUNCES + 1)).unwrap();
    assert!(matches!(
        Scene::load(&scene_path),
        Err(SceneError::BounceLimitOutOfRange { .. })
    ));
}

#[test]
fn zero_radius_in_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let scene_path = dir.path().join("flat.toml");
    fs::write(
        &scene_path,
        r#"
[materials.white]
diffuse = [1.0, 1.0, 1.0]

[[spheres]]
center = [0.0, 0.0, 0.0]
radius = 0.0
material = "white"
"#,
    )
    .unwrap();
    assert!(matches!(
        Scene::load(&scene_path),
        Err(SceneError::NonPositiveRadius { index: 0, .. })
    ));
}

#[test]
fn bundled_scene_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenes/mirrors.toml");
    let (scene, camera) = Scene::load(path).unwrap();
    assert_eq!(scene.spheres.len(), 4);
    assert_eq!(scene.lights.len(), 2);
    assert_eq!(scene.config.bounce_limit, 6);
    assert_eq!(camera.vfov, 40.0);
}

#[test]
fn nan_shininess_in_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let scene_path = dir.path().join("nan.toml");
    fs::write(&scene_path, "[materials.odd]\ndiffuse = [1.0, 1.0, 1.0]\nshininess = nan\n").unwrap();
    assert!(matches!(
        Scene::load(&scene_path),
        Err(SceneError::NegativeShininess { .. })
    ));
}

#[test]
fn camera_looking_along_up_vector_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let scene_path = dir.path().join("overhead.toml");
    fs::write(
        &scene_path,
        "[camera]\nlookfrom = [0.0, 5.0, 0.0]\nlookat = [0.0, 0.0, 0.0]\nvup = [0.0, 1.0, 0.0]\n",
    )
    .unwrap();
    assert!(matches!(Scene::load(&scene_path), Err(SceneError::InvalidCamera(_))));
}
