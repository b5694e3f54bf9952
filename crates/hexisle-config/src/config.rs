//! Configuration sections with reference defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub camera: CameraConfig,
    /// Hex grid, noise and height banding.
    pub terrain: TerrainConfig,
    /// Rock and tree scattering.
    pub decoration: DecorationConfig,
    pub clouds: CloudConfig,
    /// Water disc and basin dimensions.
    pub set_pieces: SetPieceConfig,
    pub assets: AssetConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    /// Use `PresentMode::Fifo` when set.
    pub vsync: bool,
    pub title: String,
}

/// Renderer look: clear colour, exposure, the single point light and its shadow map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// sRGB background, `0xRRGGBB`.
    pub background: u32,
    pub exposure: f32,
    /// sRGB light colour, `0xRRGGBB`.
    pub light_color: u32,
    pub light_intensity: f32,
    /// Distance at which the light contribution reaches zero.
    pub light_range: f32,
    pub light_position: [f32; 3],
    /// Cast point-light shadows from terrain and clouds.
    pub shadows: bool,
    /// Width and height of the square shadow map.
    pub shadow_map_size: u32,
}

/// Orbit camera.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Fraction of the remaining orbit velocity removed per 60 Hz tick.
    pub damping: f32,
    /// Radians of orbit per pixel of mouse drag.
    pub orbit_sensitivity: f32,
    /// Fractional distance change per scroll line.
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed of the coherent noise field.
    pub seed: u64,
    pub max_height: f32,
    pub noise_frequency: f64,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
    pub cull_radius: f32,
    /// Inclusive lower bound of both iteration axes.
    pub iteration_min: i32,
    /// Exclusive upper bound of both iteration axes.
    pub iteration_max: i32,
    /// Band thresholds as fractions of `max_height`, highest first.
    pub stone_threshold: f32,
    pub dirt_threshold: f32,
    pub grass_threshold: f32,
    pub sand_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecorationConfig {
    /// Chance that an eligible tile receives a decoration.
    pub probability: f32,
    pub rock_radius_min: f32,
    pub rock_radius_max: f32,
    /// Upper bound of the horizontal jitter on each axis.
    pub rock_jitter: f32,
    pub rock_segments: u32,
    pub tree_height_min: f32,
    pub tree_height_max: f32,
    pub tree_radii: [f32; 3],
    /// Cone offsets above the tile top, as multiples of the tree height.
    pub tree_offsets: [f32; 3],
    pub tree_lift: f32,
    pub tree_segments: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CloudConfig {
    pub min_count: u32,
    pub count_span: u32,
    /// Exponent applied to the uniform draw before scaling by `count_span`.
    pub count_exponent: f32,
    pub puff_radii: [f32; 3],
    pub puff_offsets: [f32; 3],
    pub puff_jitter: f32,
    /// Half-width of the square the clouds are scattered over.
    pub extent: f32,
    pub height_min: f32,
    pub height_max: f32,
    pub segments: u32,
}

/// Fixed geometry around the island. Heights are fractions of the terrain `max_height`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SetPieceConfig {
    pub water_radius: f32,
    pub water_height: f32,
    pub basin_wall_radius: f32,
    pub basin_wall_height: f32,
    pub basin_floor_radius: f32,
    pub basin_floor_height: f32,
    pub radial_segments: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding the textures and the environment map.
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Default tracing level when `RUST_LOG` is unset.
    pub log_level: String,
    /// Seed of the decoration and cloud random stream.
    pub random_seed: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            vsync: true,
            title: "hexisle".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: 0xFFEECC,
            exposure: 1.0,
            light_color: 0xFFCB8E,
            light_intensity: 80.0,
            light_range: 400.0,
            light_position: [10.0, 20.0, 10.0],
            shadows: true,
            shadow_map_size: 1024,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 31.0, 60.0],
            target: [0.0, 0.0, 0.0],
            damping: 0.05,
            orbit_sensitivity: 0.005,
            zoom_sensitivity: 0.1,
            min_distance: 10.0,
            max_distance: 200.0,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_height: 10.0,
            noise_frequency: 0.1,
            horizontal_spacing: 1.77,
            vertical_spacing: 1.535,
            cull_radius: 45.0,
            iteration_min: -100,
            iteration_max: 100,
            stone_threshold: 0.8,
            dirt_threshold: 0.7,
            grass_threshold: 0.5,
            sand_threshold: 0.3,
        }
    }
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            probability: 0.2,
            rock_radius_min: 0.1,
            rock_radius_max: 0.4,
            rock_jitter: 0.4,
            rock_segments: 7,
            tree_height_min: 1.25,
            tree_height_max: 2.25,
            tree_radii: [1.5, 1.15, 0.8],
            tree_offsets: [0.0, 0.6, 1.25],
            tree_lift: 1.0,
            tree_segments: 3,
        }
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            min_count: 10,
            count_span: 10,
            count_exponent: 0.45,
            puff_radii: [1.2, 1.5, 0.9],
            puff_offsets: [-1.85, 0.0, 1.85],
            puff_jitter: 0.3,
            extent: 35.0,
            height_min: 8.0,
            height_max: 16.0,
            segments: 7,
        }
    }
}

impl Default for SetPieceConfig {
    fn default() -> Self {
        Self {
            water_radius: 50.0,
            water_height: 0.2,
            basin_wall_radius: 17.1,
            basin_wall_height: 0.25,
            basin_floor_radius: 18.5,
            basin_floor_height: 0.1,
            radial_segments: 50,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("assets"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            random_seed: 0,
        }
    }
}

/// `<platform config dir>/hexisle`, or `./hexisle` when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hexisle")
}

impl Config {
    /// Load `config.ron` from `config_dir`, writing the defaults there if it does not exist.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);

        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;
        let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write this config to `config_dir/config.ron`, creating the directory if needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        let write_err = |source| ConfigError::WriteError {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(config_dir).map_err(write_err)?;
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(false)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;
        std::fs::write(&path, text).map_err(write_err)
    }

    /// Reject settings the generator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.terrain;
        if t.iteration_min >= t.iteration_max {
            return Err(invalid(
                "terrain.iteration_min",
                format!("{} is not below iteration_max {}", t.iteration_min, t.iteration_max),
            ));
        }
        if !(t.max_height > 0.0) {
            return Err(invalid("terrain.max_height", "must be positive".into()));
        }
        if !(t.cull_radius >= 0.0) {
            return Err(invalid("terrain.cull_radius", "must not be negative".into()));
        }
        let bands = [
            t.stone_threshold,
            t.dirt_threshold,
            t.grass_threshold,
            t.sand_threshold,
        ];
        if bands.windows(2).any(|w| !(w[0] > w[1])) {
            return Err(invalid(
                "terrain.stone_threshold",
                format!("band thresholds must strictly descend, got {bands:?}"),
            ));
        }

        let d = &self.decoration;
        if !(0.0..=1.0).contains(&d.probability) {
            return Err(invalid(
                "decoration.probability",
                format!("{} is outside [0, 1]", d.probability),
            ));
        }
        if d.rock_radius_min > d.rock_radius_max || d.tree_height_min > d.tree_height_max {
            return Err(invalid(
                "decoration",
                "a size range has its minimum above its maximum".into(),
            ));
        }
        if d.rock_segments < 3 || d.tree_segments < 3 {
            return Err(invalid("decoration", "segment counts must be at least 3".into()));
        }

        let size = self.render.shadow_map_size;
        if !(1..=MAX_SHADOW_MAP_SIZE).contains(&size) {
            return Err(invalid(
                "render.shadow_map_size",
                format!("{size} is outside [1, {MAX_SHADOW_MAP_SIZE}]"),
            ));
        }

        let c = &self.clouds;
        if !(c.count_exponent.is_finite() && c.count_exponent > 0.0) {
            return Err(invalid(
                "clouds.count_exponent",
                format!("{} is not a positive finite number", c.count_exponent),
            ));
        }
        if c.count_span > MAX_CLOUD_SPAN {
            return Err(invalid(
                "clouds.count_span",
                format!("{} is above the cap of {MAX_CLOUD_SPAN}", c.count_span),
            ));
        }

        if self.clouds.segments < 3 || self.set_pieces.radial_segments < 3 {
            return Err(invalid("segments", "segment counts must be at least 3".into()));
        }
        Ok(())
    }
}

const MAX_CLOUD_SPAN: u32 = 1000;
/// wgpu's default `max_texture_dimension_2d`.
const MAX_SHADOW_MAP_SIZE: u32 = 8192;

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_reference_values() {
        let config = Config::default();
        assert_eq!(config.terrain.max_height, 10.0);
        assert_eq!(config.terrain.cull_radius, 45.0);
        assert_eq!(config.terrain.iteration_min, -100);
        assert_eq!(config.terrain.iteration_max, 100);
        assert_eq!(config.decoration.probability, 0.2);
        assert_eq!(config.clouds.puff_radii, [1.2, 1.5, 0.9]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_serializes() {
        let text = ron::ser::to_string_pretty(
            &Config::default(),
            ron::ser::PrettyConfig::new().depth_limit(2),
        )
        .unwrap();
        assert!(text.contains("cull_radius: 45.0"));
        assert!(text.contains("probability: 0.2"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.terrain.seed = 42;
        config.assets.directory = PathBuf::from("/tmp/textures");
        let text = ron::to_string(&config).unwrap();
        let back: Config = ron::from_str(&text).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = ron::from_str("(terrain: (seed: 7, cull_radius: 20.0))").unwrap();
        assert_eq!(config.terrain.seed, 7);
        assert_eq!(config.terrain.cull_radius, 20.0);
        assert_eq!(config.terrain.max_height, 10.0);
        assert_eq!(config.clouds, CloudConfig::default());
    }

    #[test]
    fn test_unknown_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(shadows: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.terrain.seed = 99;
        config.decoration.probability = 0.5;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "(terrain: (iteration_min: 5, iteration_max: 5))",
        )
        .unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "terrain.iteration_min",
                ..
            }
        ));
    }

    #[test]
    fn test_thresholds_must_descend() {
        let mut config = Config::default();
        config.terrain.grass_threshold = 0.75;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_probability_bounds() {
        let mut config = Config::default();
        config.decoration.probability = 1.5;
        assert!(config.validate().is_err());
        config.decoration.probability = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cloud_count_settings_are_bounded() {
        let mut config = Config::default();
        config.clouds.count_exponent = -0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "clouds.count_exponent",
                ..
            })
        ));
        config.clouds.count_exponent = f32::NAN;
        assert!(config.validate().is_err());

        config.clouds.count_exponent = 0.45;
        config.clouds.count_span = u32::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "clouds.count_span",
                ..
            })
        ));
        config.clouds.count_span = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shadow_map_size_bounds() {
        let mut config = Config::default();
        assert!(config.render.shadows);
        assert_eq!(config.render.shadow_map_size, 1024);
        config.render.shadow_map_size = 0;
        assert!(config.validate().is_err());
        config.render.shadow_map_size = 16_384;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_dir_ends_with_app_name() {
        assert!(default_config_dir().ends_with("hexisle"));
    }
}
