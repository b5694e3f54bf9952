use glam::Vec3;
use hexisle_config::Config;
use hexisle_materials::{linear_from_hex, srgb_to_linear};
use hexisle_mesh::CloudParams;
use hexisle_terrain::{BandThresholds, DecorationParams, HexGrid, TerrainParams, TileRange};

use crate::graph::PointLight;
use crate::set_pieces::SetPieceParams;

/// Everything a generation pass needs besides randomness.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneParams {
    pub terrain: TerrainParams,
    pub decoration: DecorationParams,
    pub clouds: CloudParams,
    pub set_pieces: SetPieceParams,
    pub light: PointLight,
    /// Linear RGB.
    pub background: Vec3,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SceneParams {
    pub fn from_config(config: &Config) -> Self {
        let t = &config.terrain;
        let d = &config.decoration;
        let c = &config.clouds;
        let s = &config.set_pieces;
        let r = &config.render;

        // The warm light tint is linearised twice; a single conversion washes the island out.
        let once = linear_from_hex(r.light_color);
        let light_color = Vec3::new(
            srgb_to_linear(once.x),
            srgb_to_linear(once.y),
            srgb_to_linear(once.z),
        );

        Self {
            terrain: TerrainParams {
                seed: t.seed,
                max_height: t.max_height,
                noise_frequency: t.noise_frequency,
                grid: HexGrid::new(t.horizontal_spacing, t.vertical_spacing),
                cull_radius: t.cull_radius,
                range: TileRange::new(t.iteration_min, t.iteration_max),
                bands: BandThresholds {
                    stone: t.stone_threshold,
                    dirt: t.dirt_threshold,
                    grass: t.grass_threshold,
                    sand: t.sand_threshold,
                },
            },
            decoration: DecorationParams {
                probability: d.probability,
                rock_radius: (d.rock_radius_min, d.rock_radius_max),
                rock_jitter: d.rock_jitter,
                rock_segments: d.rock_segments,
                tree_height: (d.tree_height_min, d.tree_height_max),
                tree_radii: d.tree_radii,
                tree_offsets: d.tree_offsets,
                tree_lift: d.tree_lift,
                tree_segments: d.tree_segments,
            },
            clouds: CloudParams {
                count_min: c.min_count,
                count_span: c.count_span,
                count_exponent: c.count_exponent,
                puff_radii: c.puff_radii,
                puff_offsets: c.puff_offsets,
                puff_jitter: c.puff_jitter,
                extent: c.extent,
                height: (c.height_min, c.height_max),
                segments: c.segments,
            },
            set_pieces: SetPieceParams {
                water_radius: s.water_radius,
                water_height: s.water_height,
                basin_wall_radius: s.basin_wall_radius,
                basin_wall_height: s.basin_wall_height,
                basin_floor_radius: s.basin_floor_radius,
                basin_floor_height: s.basin_floor_height,
                radial_segments: s.radial_segments,
            },
            light: PointLight {
                position: Vec3::from_array(r.light_position),
                color: light_color,
                intensity: r.light_intensity,
                range: r.light_range,
            },
            background: linear_from_hex(r.background),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_library_defaults() {
        let params = SceneParams::default();
        assert_eq!(params.terrain, TerrainParams::default());
        assert_eq!(params.decoration, DecorationParams::default());
        assert_eq!(params.clouds, CloudParams::default());
        assert_eq!(params.set_pieces, SetPieceParams::default());
    }

    #[test]
    fn test_overrides_flow_through() {
        let mut config = Config::default();
        config.terrain.seed = 77;
        config.terrain.iteration_min = -5;
        config.terrain.iteration_max = 5;
        config.decoration.probability = 0.0;
        let params = SceneParams::from_config(&config);
        assert_eq!(params.terrain.seed, 77);
        assert_eq!(params.terrain.range, TileRange::new(-5, 5));
        assert_eq!(params.decoration.probability, 0.0);
    }

    #[test]
    fn test_light_is_warm_and_darker_than_single_conversion() {
        let params = SceneParams::default();
        let single = linear_from_hex(0xFFCB8E);
        assert!((params.light.color.x - 1.0).abs() < 1e-4);
        assert!(params.light.color.y < single.y);
        assert!(params.light.color.z < params.light.color.y);
        assert_eq!(params.light.position, Vec3::new(10.0, 20.0, 10.0));
    }
}
