//! Tile, decoration and cloud geometry, already placed in world space.

use std::f32::consts::TAU;

use hexisle_terrain::{DecorationKind, DecorationParams, PlanarPosition, RandomSource};

use crate::geometry::{Geometry, merge};
use crate::primitives::{cone, cylinder, sphere};

/// Six-sided column of unit radius from `y = 0` up to `y = height`.
pub fn hex_prism(height: f32, position: PlanarPosition) -> Geometry {
    let mut geo = cylinder(1.0, 1.0, height, 6, 1, false);
    geo.translate(position.at_height(height * 0.5));
    geo
}

/// Small sphere resting on the tile top, nudged off-centre.
///
/// Draws the x jitter, the z jitter, then the radius.
pub fn rock(
    height: f32,
    position: PlanarPosition,
    params: &DecorationParams,
    rng: &mut dyn RandomSource,
) -> Geometry {
    let jitter_x = rng.range(0.0, params.rock_jitter);
    let jitter_z = rng.range(0.0, params.rock_jitter);
    let radius = rng.range(params.rock_radius.0, params.rock_radius.1);

    let mut geo = sphere(radius, params.rock_segments, params.rock_segments);
    geo.translate(glam::Vec3::new(
        position.x + jitter_x,
        height,
        position.z + jitter_z,
    ));
    geo
}

/// Three stacked cones sharing one random height, merged.
pub fn tree_cluster(
    height: f32,
    position: PlanarPosition,
    params: &DecorationParams,
    rng: &mut dyn RandomSource,
) -> Geometry {
    let tree_height = rng.range(params.tree_height.0, params.tree_height.1);

    let cones: Vec<Geometry> = params
        .tree_radii
        .iter()
        .zip(params.tree_offsets)
        .map(|(&radius, offset)| {
            let mut geo = cone(radius, tree_height, params.tree_segments);
            geo.translate(position.at_height(height + tree_height * offset + params.tree_lift));
            geo
        })
        .collect();
    merge(&cones)
}

pub fn decoration(
    kind: DecorationKind,
    height: f32,
    position: PlanarPosition,
    params: &DecorationParams,
    rng: &mut dyn RandomSource,
) -> Geometry {
    match kind {
        DecorationKind::Rock => rock(height, position, params, rng),
        DecorationKind::TreeCluster => tree_cluster(height, position, params, rng),
    }
}

/// Layout of the cloud layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudParams {
    pub count_min: u32,
    pub count_span: u32,
    pub count_exponent: f32,
    pub puff_radii: [f32; 3],
    /// Puff centres along X before the cluster is placed.
    pub puff_offsets: [f32; 3],
    pub puff_jitter: f32,
    /// Half-width of the square clouds are scattered over.
    pub extent: f32,
    pub height: (f32, f32),
    pub segments: u32,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            count_min: 10,
            count_span: 10,
            count_exponent: 0.45,
            puff_radii: [1.2, 1.5, 0.9],
            puff_offsets: [-1.85, 0.0, 1.85],
            puff_jitter: 0.3,
            extent: 35.0,
            height: (8.0, 16.0),
            segments: 7,
        }
    }
}

/// Number of clouds, `floor(u^exponent * span + min)`.
///
/// The exponent below one skews the count towards the top of the range.
/// The result never leaves `[count_min, count_min + count_span]`.
pub fn cloud_count(params: &CloudParams, rng: &mut dyn RandomSource) -> u32 {
    let span = params.count_span as f32;
    let scaled = (rng.next_float().powf(params.count_exponent) * span).floor();
    // NaN maps to 0 under `as`.
    let extra = scaled.clamp(0.0, span) as u32;
    params.count_min.saturating_add(extra.min(params.count_span))
}

/// Three puffs in a row, dropped somewhere in the sky box and then swung
/// about the world vertical axis.
pub fn cloud_cluster(params: &CloudParams, rng: &mut dyn RandomSource) -> Geometry {
    let puffs: Vec<Geometry> = params
        .puff_radii
        .iter()
        .zip(params.puff_offsets)
        .map(|(&radius, offset)| {
            let mut puff = sphere(radius, params.segments, params.segments);
            puff.translate(glam::Vec3::new(offset, rng.range(0.0, params.puff_jitter), 0.0));
            puff
        })
        .collect();

    let mut cloud = merge(&puffs);
    let x = rng.range(-params.extent, params.extent);
    let y = rng.range(params.height.0, params.height.1);
    let z = rng.range(-params.extent, params.extent);
    cloud.translate(glam::Vec3::new(x, y, z));
    cloud.rotate_y(rng.range(0.0, TAU));
    cloud
}

/// The whole cloud layer merged into one geometry, with the number of clusters.
pub fn clouds(params: &CloudParams, rng: &mut dyn RandomSource) -> (Geometry, u32) {
    let count = cloud_count(params, rng);
    let mut layer = Geometry::empty();
    for _ in 0..count {
        layer.append(&cloud_cluster(params, rng));
    }
    (layer, count)
}
