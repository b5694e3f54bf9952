//! Assembles the hex island: tiles into per-material batches, decorations,
//! clouds, the sea and its basin, and the light they are shown under.

mod assembler;
mod batches;
mod graph;
mod params;
mod set_pieces;
mod stats;

pub use assembler::{SceneAssembler, TileOutcome, generate};
pub use batches::TerrainBatches;
pub use graph::{PointLight, Renderable, SceneGraph};
pub use params::SceneParams;
pub use set_pieces::{SetPieceParams, basin_floor, basin_wall, water};
pub use stats::GenerationStats;
