//! Indexed triangle geometry with transforms baked into its vertices.

use glam::{Mat3, Vec3};

/// One vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::const_assert_eq!(std::mem::size_of::<MeshVertex>(), 32);

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
        }
    }
}

/// Triangle list: every three entries of `indices` form one triangle, front
/// faces wound counter-clockwise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Geometry with no vertices. Renderers must accept it and draw nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        for v in &mut self.vertices {
            v.position = (Vec3::from(v.position) + offset).to_array();
        }
        self
    }

    /// Rotate about the world vertical axis through the origin.
    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        let rotation = Mat3::from_rotation_y(angle);
        for v in &mut self.vertices {
            v.position = (rotation * Vec3::from(v.position)).to_array();
            v.normal = (rotation * Vec3::from(v.normal)).to_array();
        }
        self
    }

    /// Append `other`, rebasing its indices past the vertices already present.
    pub fn append(&mut self, other: &Geometry) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Axis-aligned bounds, or `None` for empty geometry.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut positions = self.vertices.iter().map(|v| Vec3::from(v.position));
        let first = positions.next()?;
        Some(positions.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Concatenate any number of geometries into one.
///
/// Zero inputs give an empty geometry. Vertex and index counts of the result
/// are the sums of the inputs.
pub fn merge<'a>(parts: impl IntoIterator<Item = &'a Geometry>) -> Geometry {
    let mut merged = Geometry::empty();
    for part in parts {
        merged.append(part);
    }
    merged
}
