//! `wgpu` vertex layout for [`MeshVertex`].
//!
//! | Location | Offset | Format    | Field    |
//! |----------|--------|-----------|----------|
//! | 0        | 0      | Float32x3 | position |
//! | 1        | 12     | Float32x3 | normal   |
//! | 2        | 24     | Float32x2 | uv       |

use std::mem;

use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

use crate::geometry::MeshVertex;

pub const MESH_VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 12,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 24,
        shader_location: 2,
    },
];

/// Layout shared by every island pipeline.
pub const MESH_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<MeshVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &MESH_VERTEX_ATTRIBUTES,
};

const _: () = assert!(
    mem::offset_of!(MeshVertex, normal) == 12 && mem::offset_of!(MeshVertex, uv) == 24,
    "MeshVertex field order changed, update MESH_VERTEX_ATTRIBUTES"
);

const _: () = assert!(
    MESH_VERTEX_ATTRIBUTES[2].offset + 8 == mem::size_of::<MeshVertex>() as u64,
    "last attribute must end at the stride"
);
