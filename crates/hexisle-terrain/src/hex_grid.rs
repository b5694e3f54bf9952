//! Offset ("brick") hex layout: every odd row is shifted by half a tile.

use glam::Vec3;

/// Signed column/row index of a candidate tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub column: i32,
    pub row: i32,
}

impl TileCoord {
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }
}

/// Position of a tile centre on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarPosition {
    pub x: f32,
    pub z: f32,
}

impl PlanarPosition {
    pub fn distance_from_origin(self) -> f32 {
        self.x.hypot(self.z)
    }

    /// Lift to 3D at height `y`.
    pub fn at_height(self, y: f32) -> Vec3 {
        Vec3::new(self.x, y, self.z)
    }
}

/// Projection from tile indices to the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexGrid {
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
}

impl Default for HexGrid {
    /// Spacing for unit-radius hexes packed flat-to-flat.
    fn default() -> Self {
        Self {
            horizontal_spacing: 1.77,
            vertical_spacing: 1.535,
        }
    }
}

impl HexGrid {
    pub const fn new(horizontal_spacing: f32, vertical_spacing: f32) -> Self {
        Self {
            horizontal_spacing,
            vertical_spacing,
        }
    }

    /// Centre of `coord` on the plane.
    ///
    /// The row parity uses a truncated remainder, so negative odd rows shift
    /// by -0.5 rather than +0.5. Rows stay distinct in z either way, which keeps
    /// the mapping injective.
    pub fn tile_to_position(&self, coord: TileCoord) -> PlanarPosition {
        let row_shift = (coord.row % 2) as f32 * 0.5;
        PlanarPosition {
            x: (coord.column as f32 + row_shift) * self.horizontal_spacing,
            z: coord.row as f32 * self.vertical_spacing,
        }
    }

    /// Whether `position` lies within `radius` of the origin (inclusive).
    ///
    /// Non-finite positions are never in bounds.
    pub fn is_within_bounds(position: PlanarPosition, radius: f32) -> bool {
        position.distance_from_origin() <= radius
    }
}

/// Square block of coordinates `[min, max)` on both axes, visited column-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub min: i32,
    pub max: i32,
}

impl TileRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn len(&self) -> usize {
        let side = (self.max as i64 - self.min as i64).max(0) as usize;
        side * side
    }

    pub fn is_empty(&self) -> bool {
        self.min >= self.max
    }

    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + use<> {
        let (min, max) = (self.min, self.max);
        (min..max).flat_map(move |column| (min..max).map(move |row| TileCoord::new(column, row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_origin_maps_to_origin() {
        let p = HexGrid::default().tile_to_position(TileCoord::new(0, 0));
        assert_eq!(p, PlanarPosition { x: 0.0, z: 0.0 });
    }

    #[test]
    fn test_odd_rows_are_shifted_half_a_tile() {
        let grid = HexGrid::default();
        let even = grid.tile_to_position(TileCoord::new(2, 2));
        let odd = grid.tile_to_position(TileCoord::new(2, 3));
        assert!((even.x - 2.0 * 1.77).abs() < EPSILON);
        assert!((odd.x - 2.5 * 1.77).abs() < EPSILON);
        assert!((odd.z - 3.0 * 1.535).abs() < EPSILON);
    }

    #[test]
    fn test_negative_odd_rows_shift_left() {
        let p = HexGrid::default().tile_to_position(TileCoord::new(0, -1));
        assert!((p.x + 0.5 * 1.77).abs() < EPSILON, "got x = {}", p.x);
        assert!((p.z + 1.535).abs() < EPSILON);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let grid = HexGrid::default();
        for coord in TileRange::new(-10, 10).iter() {
            assert_eq!(grid.tile_to_position(coord), grid.tile_to_position(coord));
        }
    }

    #[test]
    fn test_projection_is_injective() {
        let grid = HexGrid::default();
        let range = TileRange::new(-100, 100);
        // Quantize well below the smallest spacing so distinct tiles cannot collide.
        let mut seen = HashSet::with_capacity(range.len());
        for coord in range.iter() {
            let p = grid.tile_to_position(coord);
            let key = ((p.x * 100.0).round() as i64, (p.z * 100.0).round() as i64);
            assert!(seen.insert(key), "{coord:?} collides at {p:?}");
        }
        assert_eq!(seen.len(), 200 * 200);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let on_edge = PlanarPosition { x: 3.0, z: 4.0 };
        assert!(HexGrid::is_within_bounds(on_edge, 5.0));
        assert!(!HexGrid::is_within_bounds(on_edge, 4.999));
    }

    #[test]
    fn test_non_finite_position_is_out_of_bounds() {
        let p = PlanarPosition { x: f32::NAN, z: 0.0 };
        assert!(!HexGrid::is_within_bounds(p, 45.0));
    }

    #[test]
    fn test_range_visits_every_coordinate_once() {
        let range = TileRange::new(-2, 3);
        let coords: Vec<_> = range.iter().collect();
        assert_eq!(coords.len(), range.len());
        assert_eq!(coords.first(), Some(&TileCoord::new(-2, -2)));
        assert_eq!(coords[1], TileCoord::new(-2, -1));
        assert_eq!(coords.last(), Some(&TileCoord::new(2, 2)));
    }

    #[test]
    fn test_empty_range() {
        let range = TileRange::new(5, 5);
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert_eq!(range.iter().count(), 0);
    }
}
