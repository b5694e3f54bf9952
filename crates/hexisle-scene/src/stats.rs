use hexisle_terrain::MaterialClass;

/// Counters collected during one generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Coordinates visited in the iteration range.
    pub candidates: usize,
    pub culled_by_radius: usize,
    /// Tiles dropped because their height sample was not a finite number.
    pub culled_non_finite: usize,
    pub tiles: [usize; 5],
    pub vertices: [usize; 5],
    pub rocks: usize,
    pub trees: usize,
    pub clouds: u32,
}

impl GenerationStats {
    pub fn surviving(&self) -> usize {
        self.tiles.iter().sum()
    }

    pub fn tiles_in(&self, class: MaterialClass) -> usize {
        self.tiles[class.index()]
    }

    pub fn vertices_in(&self, class: MaterialClass) -> usize {
        self.vertices[class.index()]
    }

    pub fn log_summary(&self) {
        tracing::info!(
            candidates = self.candidates,
            surviving = self.surviving(),
            culled_by_radius = self.culled_by_radius,
            culled_non_finite = self.culled_non_finite,
            rocks = self.rocks,
            trees = self.trees,
            clouds = self.clouds,
            "Island assembled"
        );
        for class in MaterialClass::ALL {
            tracing::debug!(
                class = %class,
                tiles = self.tiles_in(class),
                vertices = self.vertices_in(class),
                "Terrain batch"
            );
        }
    }
}
