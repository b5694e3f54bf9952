use crate::classify::{BandThresholds, TileClassifier};
use crate::hex_grid::{HexGrid, TileRange};
use crate::noise_field::NoiseField;

/// Everything that decides which tiles exist and what they are made of.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainParams {
    pub seed: u64,
    pub max_height: f32,
    pub noise_frequency: f64,
    pub grid: HexGrid,
    pub cull_radius: f32,
    pub range: TileRange,
    pub bands: BandThresholds,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 0,
            max_height: 10.0,
            noise_frequency: 0.1,
            grid: HexGrid::default(),
            cull_radius: 45.0,
            range: TileRange::new(-100, 100),
            bands: BandThresholds::default(),
        }
    }
}

impl TerrainParams {
    pub fn noise_field(&self) -> NoiseField {
        NoiseField::new(self.seed, self.noise_frequency, self.max_height)
    }

    pub fn classifier(&self, decoration: &DecorationParams) -> TileClassifier {
        TileClassifier::new(self.max_height, self.bands, decoration.probability)
    }
}

/// Odds and sizes of rocks and tree clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationParams {
    pub probability: f32,
    pub rock_radius: (f32, f32),
    pub rock_jitter: f32,
    pub rock_segments: u32,
    pub tree_height: (f32, f32),
    /// Base radius of each cone, bottom to top.
    pub tree_radii: [f32; 3],
    /// Height of each cone above the tile top, in tree heights.
    pub tree_offsets: [f32; 3],
    /// Extra lift applied to every cone.
    pub tree_lift: f32,
    pub tree_segments: u32,
}

impl Default for DecorationParams {
    fn default() -> Self {
        Self {
            probability: 0.2,
            rock_radius: (0.1, 0.4),
            rock_jitter: 0.4,
            rock_segments: 7,
            tree_height: (1.25, 2.25),
            tree_radii: [1.5, 1.15, 0.8],
            tree_offsets: [0.0, 0.6, 1.25],
            tree_lift: 1.0,
            tree_segments: 3,
        }
    }
}
