//! Tile layout, height sampling and material classification for the hex island.

mod classify;
mod hex_grid;
mod noise_field;
mod params;
mod random;

pub use classify::{BandThresholds, Decoration, DecorationKind, MaterialClass, TileClassifier};
pub use hex_grid::{HexGrid, PlanarPosition, TileCoord, TileRange};
pub use noise_field::NoiseField;
pub use params::{DecorationParams, TerrainParams};
pub use random::{RandomSource, ScriptedRandom, SeededRandom, derive_seed};
