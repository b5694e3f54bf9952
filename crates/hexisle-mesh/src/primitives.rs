//! Parametric solids centred on the origin.
//!
//! Tessellation matches the usual scene-graph conventions: the seam of every
//! ring starts at +Z, cylinders run from `-h/2` to `+h/2` along Y, and caps
//! are fans with one centre vertex per segment so each wedge gets its own UV.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::geometry::{Geometry, MeshVertex};

/// Truncated cone along Y.
///
/// Vertex count: `(radial + 1) * (height_segments + 1)` for the side, plus
/// `2 * radial + 1` for each cap whose radius is non-zero (none if `open_ended`).
pub fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
) -> Geometry {
    let radial = radial_segments.max(3);
    let rows = height_segments.max(1);
    let half = height * 0.5;
    // A flat tile has no side slope to speak of.
    let slope = if height > 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    let mut geo = Geometry::empty();

    for y in 0..=rows {
        let v = y as f32 / rows as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        for x in 0..=radial {
            let u = x as f32 / radial as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            geo.vertices.push(MeshVertex::new(
                Vec3::new(radius * sin, half - v * height, radius * cos),
                Vec3::new(sin, slope, cos).normalize(),
                [u, 1.0 - v],
            ));
        }
    }

    let stride = radial + 1;
    for x in 0..radial {
        for y in 0..rows {
            let a = y * stride + x;
            let b = (y + 1) * stride + x;
            let c = (y + 1) * stride + x + 1;
            let d = y * stride + x + 1;
            geo.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    if !open_ended {
        if radius_top > 0.0 {
            push_cap(&mut geo, radius_top, half, radial, true);
        }
        if radius_bottom > 0.0 {
            push_cap(&mut geo, radius_bottom, half, radial, false);
        }
    }
    geo
}

fn push_cap(geo: &mut Geometry, radius: f32, half: f32, radial: u32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let normal = Vec3::new(0.0, sign, 0.0);
    let y = half * sign;

    let centre_start = geo.vertices.len() as u32;
    for _ in 0..radial {
        geo.vertices
            .push(MeshVertex::new(Vec3::new(0.0, y, 0.0), normal, [0.5, 0.5]));
    }
    let ring_start = geo.vertices.len() as u32;
    for x in 0..=radial {
        let (sin, cos) = (x as f32 / radial as f32 * TAU).sin_cos();
        geo.vertices.push(MeshVertex::new(
            Vec3::new(radius * sin, y, radius * cos),
            normal,
            [cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5],
        ));
    }

    for x in 0..radial {
        let c = centre_start + x;
        let i = ring_start + x;
        if top {
            geo.indices.extend_from_slice(&[i, i + 1, c]);
        } else {
            geo.indices.extend_from_slice(&[i + 1, i, c]);
        }
    }
}

/// Cone with its apex at `+h/2` and a closed base.
pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Geometry {
    cylinder(0.0, radius, height, radial_segments, 1, false)
}

/// UV sphere with `(width + 1) * (height + 1)` vertices; the pole rows are
/// degenerate and emit one triangle per quad instead of two.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let cols = width_segments.max(3);
    let rows = height_segments.max(2);
    let mut geo = Geometry::empty();

    for iy in 0..=rows {
        let v = iy as f32 / rows as f32;
        let u_offset = if iy == 0 {
            0.5 / cols as f32
        } else if iy == rows {
            -0.5 / cols as f32
        } else {
            0.0
        };
        let (sin_theta, cos_theta) = (v * PI).sin_cos();
        for ix in 0..=cols {
            let u = ix as f32 / cols as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();
            let dir = Vec3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
            geo.vertices.push(MeshVertex::new(
                dir * radius,
                dir.normalize_or(Vec3::Y),
                [u + u_offset, 1.0 - v],
            ));
        }
    }

    let stride = cols + 1;
    for iy in 0..rows {
        for ix in 0..cols {
            let a = iy * stride + ix + 1;
            let b = iy * stride + ix;
            let c = (iy + 1) * stride + ix;
            let d = (iy + 1) * stride + ix + 1;
            if iy != 0 {
                geo.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != rows - 1 {
                geo.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    geo
}
