//! Coherent noise sampled per tile and scaled to terrain heights.

use noise::{NoiseFn, Simplex};

use crate::hex_grid::TileCoord;

/// Deterministic 2D simplex field remapped to `[0, 1]`.
pub struct NoiseField {
    noise: Simplex,
    frequency: f64,
    max_height: f32,
}

impl NoiseField {
    pub fn new(seed: u64, frequency: f64, max_height: f32) -> Self {
        // Simplex only takes 32 bits; fold the high half in so both halves matter.
        let folded = (seed ^ (seed >> 32)) as u32;
        Self {
            noise: Simplex::new(folded),
            frequency,
            max_height,
        }
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Noise at `(column, row) * frequency`, mapped from `[-1, 1]` into `[0, 1]`.
    ///
    /// A non-finite noise value is passed through so the caller can cull the tile.
    pub fn sample(&self, coord: TileCoord) -> f32 {
        let raw = self.noise.get([
            coord.column as f64 * self.frequency,
            coord.row as f64 * self.frequency,
        ]);
        (((raw + 1.0) * 0.5) as f32).clamp(0.0, 1.0)
    }

    /// Height for a `[0, 1]` noise value, or `None` when the value is not finite.
    pub fn height_for(&self, noise_value: f32) -> Option<f32> {
        if !noise_value.is_finite() {
            return None;
        }
        Some((noise_value * self.max_height).clamp(0.0, self.max_height))
    }

    /// `sample` followed by `height_for`.
    pub fn height_at(&self, coord: TileCoord) -> Option<f32> {
        self.height_for(self.sample(coord))
    }
}
