//! Fixed geometry around the island: the sea disc and the basin holding it.

use glam::Vec3;
use hexisle_mesh::{Geometry, cylinder};

/// Radii and heights of the set pieces; heights are fractions of the terrain maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct SetPieceParams {
    pub water_radius: f32,
    pub water_height: f32,
    pub basin_wall_radius: f32,
    pub basin_wall_height: f32,
    pub basin_floor_radius: f32,
    pub basin_floor_height: f32,
    pub radial_segments: u32,
}

impl Default for SetPieceParams {
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

/// Closed or open disc resting on `y = 0`.
fn grounded_disc(radius: f32, height: f32, segments: u32, open_ended: bool) -> Geometry {
    let mut geo = cylinder(radius, radius, height, segments, 1, open_ended);
    geo.translate(Vec3::new(0.0, height * 0.5, 0.0));
    geo
}

pub fn water(params: &SetPieceParams, max_height: f32) -> Geometry {
    grounded_disc(
        params.water_radius,
        max_height * params.water_height,
        params.radial_segments,
        false,
    )
}

/// Open ring, visible from both sides.
pub fn basin_wall(params: &SetPieceParams, max_height: f32) -> Geometry {
    grounded_disc(
        params.basin_wall_radius,
        max_height * params.basin_wall_height,
        params.radial_segments,
        true,
    )
}

pub fn basin_floor(params: &SetPieceParams, max_height: f32) -> Geometry {
    grounded_disc(
        params.basin_floor_radius,
        max_height * params.basin_floor_height,
        params.radial_segments,
        false,
    )
}
