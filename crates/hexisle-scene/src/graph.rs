use glam::Vec3;
use hexisle_materials::MaterialDesc;
use hexisle_mesh::Geometry;
use hexisle_terrain::MaterialClass;

use crate::stats::GenerationStats;

/// Geometry paired with the material it is drawn with.
#[derive(Debug, Clone)]
pub struct Renderable {
    pub geometry: Geometry,
    pub material: MaterialDesc,
}

impl Renderable {
    pub fn new(geometry: Geometry, material: MaterialDesc) -> Self {
        Self { geometry, material }
    }
}

/// Point light with physically based inverse-square falloff, cut off at `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    /// Linear RGB.
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
}

/// The finished, immutable island.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    /// One batch per material class, in `MaterialClass::ALL` order.
    pub terrain: [Renderable; 5],
    pub water: Renderable,
    pub basin_wall: Renderable,
    pub basin_floor: Renderable,
    pub clouds: Renderable,
    pub light: PointLight,
    /// Linear RGB clear colour.
    pub background: Vec3,
    pub stats: GenerationStats,
}

impl SceneGraph {
    pub fn terrain_batch(&self, class: MaterialClass) -> &Renderable {
        &self.terrain[class.index()]
    }

    /// Every renderable, terrain first and water last.
    pub fn renderables(&self) -> impl Iterator<Item = &Renderable> {
        self.terrain.iter().chain([
            &self.basin_floor,
            &self.basin_wall,
            &self.clouds,
            &self.water,
        ])
    }

    pub fn total_vertices(&self) -> usize {
        self.renderables().map(|r| r.geometry.vertex_count()).sum()
    }
}
