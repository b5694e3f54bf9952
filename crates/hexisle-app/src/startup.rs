//! Everything `main` does before the event loop starts.

use std::path::{Path, PathBuf};

use glam::Vec3;
use hexisle_config::{CameraConfig, CliArgs, Config, RenderConfig, default_config_dir};
use hexisle_materials::{AssetError, TextureSet};
use hexisle_render::{Camera, OrbitController, RenderSettings, ShadowSettings};
use hexisle_scene::{SceneGraph, SceneParams, generate};
use tracing::{info, warn};

pub fn resolve_config_dir(args: &CliArgs) -> PathBuf {
    args.config.clone().unwrap_or_else(default_config_dir)
}

/// Loads `config.ron` (writing defaults on first run), then applies CLI
/// overrides. A file that fails to parse or validate is reported and replaced
/// by defaults for this run; the file itself is left untouched.
///
/// Logging is not up yet when this runs, so problems go to stderr.
pub fn load_config(config_dir: &Path, args: &CliArgs) -> Config {
    let mut config = Config::load_or_create(config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(args);
    config
}

/// Generates the island. The assembler logs the per-batch statistics.
pub fn build_scene(config: &Config) -> SceneGraph {
    info!(
        seed = config.terrain.seed,
        random_seed = config.debug.random_seed,
        "Generating island"
    );
    let scene = generate(SceneParams::from_config(config), config.debug.random_seed);
    info!(vertices = scene.total_vertices(), "Scene ready");
    scene
}

/// Headless runs never open the asset directory; the placeholder set is
/// returned so callers need not branch.
pub fn load_textures(config: &Config, headless: bool) -> Result<TextureSet, AssetError> {
    if headless {
        return Ok(TextureSet::placeholder());
    }
    let dir = &config.assets.directory;
    info!("Loading textures from {}", dir.display());
    TextureSet::load(dir)
}

pub fn render_settings(config: &RenderConfig) -> RenderSettings {
    RenderSettings {
        exposure: config.exposure,
        shadows: ShadowSettings {
            enabled: config.shadows,
            map_size: config.shadow_map_size,
        },
    }
}

pub fn initial_camera(config: &CameraConfig, width: u32, height: u32) -> (Camera, OrbitController) {
    let position = Vec3::from(config.position);
    let target = Vec3::from(config.target);
    let mut camera = Camera::new(position, target, config.fov_degrees, config.near, config.far);
    camera.set_aspect_ratio(width, height);

    let orbit = OrbitController::new(position, target)
        .with_damping(config.damping)
        .with_sensitivity(config.orbit_sensitivity, config.zoom_sensitivity)
        .with_distance_limits(config.min_distance, config.max_distance);
    if orbit.distance() != position.distance(target) {
        warn!(
            "Camera distance {:.1} is outside [{}, {}], clamped",
            position.distance(target),
            config.min_distance,
            config.max_distance
        );
    }
    (camera, orbit)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_explicit_config_dir_wins() {
        let args = CliArgs {
            config: Some(PathBuf::from("/tmp/island")),
            ..Default::default()
        };
        assert_eq!(resolve_config_dir(&args), PathBuf::from("/tmp/island"));
        assert!(resolve_config_dir(&CliArgs::default()).ends_with("hexisle"));
    }

    #[test]
    fn test_first_run_writes_defaults_and_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            seed: Some(99),
            ..Default::default()
        };
        let config = load_config(dir.path(), &args);
        assert_eq!(config.terrain.seed, 99);
        assert!(dir.path().join("config.ron").exists());

        let reloaded = load_config(dir.path(), &CliArgs::default());
        assert_eq!(reloaded.terrain.seed, Config::default().terrain.seed);
    }

    #[test]
    fn test_broken_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "(window: oops").unwrap();
        let config = load_config(dir.path(), &CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_headless_skips_assets() {
        let mut config = Config::default();
        config.assets.directory = PathBuf::from("/definitely/not/here");
        assert!(load_textures(&config, true).is_ok());
        assert!(matches!(
            load_textures(&config, false),
            Err(AssetError::MissingDirectory(_))
        ));
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_build_scene_logs_summary_once() {
        let mut config = Config::default();
        config.terrain.iteration_min = -12;
        config.terrain.iteration_max = 12;
        config.terrain.cull_radius = 10.0;

        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let scene = tracing::subscriber::with_default(subscriber, || build_scene(&config));
        assert!(scene.stats.surviving() > 0);

        let text = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.matches("Island assembled").count(), 1, "{text}");
        assert_eq!(text.matches("Terrain batch").count(), 5, "{text}");
        assert_eq!(text.matches("Scene ready").count(), 1, "{text}");
    }

    #[test]
    fn test_render_settings_follow_config() {
        let mut config = RenderConfig::default();
        assert_eq!(render_settings(&config), RenderSettings::default());

        config.shadows = false;
        config.shadow_map_size = 2048;
        config.exposure = 1.5;
        let settings = render_settings(&config);
        assert!(!settings.shadows.enabled);
        assert_eq!(settings.shadows.map_size, 2048);
        assert_eq!(settings.exposure, 1.5);
    }

    #[test]
    fn test_initial_camera_matches_config() {
        let config = CameraConfig::default();
        let (camera, orbit) = initial_camera(&config, 1280, 720);
        assert_eq!(camera.position, Vec3::new(0.0, 31.0, 60.0));
        assert!((camera.fov_y - 45f32.to_radians()).abs() < 1e-6);
        assert!((camera.aspect_ratio - 1280.0 / 720.0).abs() < 1e-6);
        assert!(orbit.position().distance(camera.position) < 1e-3);
    }
}
