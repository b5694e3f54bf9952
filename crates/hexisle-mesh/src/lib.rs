//! Geometry for the hex island: primitives, tile and decoration builders, and
//! batching by concatenation.

mod builders;
mod geometry;
mod primitives;
mod vertex_layout;

pub use builders::{
    CloudParams, cloud_cluster, cloud_count, clouds, decoration, hex_prism, rock, tree_cluster,
};
pub use geometry::{Geometry, MeshVertex, merge};
pub use primitives::{cone, cylinder, sphere};
pub use vertex_layout::{MESH_VERTEX_ATTRIBUTES, MESH_VERTEX_LAYOUT};
