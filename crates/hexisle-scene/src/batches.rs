use hexisle_mesh::Geometry;
use hexisle_terrain::MaterialClass;

/// One growing geometry per material class, owned by a single generation pass.
#[derive(Debug, Default)]
pub struct TerrainBatches {
    batches: [Geometry; 5],
    tiles: [usize; 5],
}

impl TerrainBatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tile's prism and count it towards `class`.
    pub fn add_tile(&mut self, class: MaterialClass, prism: &Geometry) {
        self.batches[class.index()].append(prism);
        self.tiles[class.index()] += 1;
    }

    /// Append decoration geometry. Decorations never count as tiles.
    pub fn add_decoration(&mut self, target: MaterialClass, geometry: &Geometry) {
        self.batches[target.index()].append(geometry);
    }

    pub fn get(&self, class: MaterialClass) -> &Geometry {
        &self.batches[class.index()]
    }

    pub fn tile_count(&self, class: MaterialClass) -> usize {
        self.tiles[class.index()]
    }

    /// Finished batches in `MaterialClass::ALL` order.
    pub fn into_geometries(self) -> [Geometry; 5] {
        self.batches
    }
}
