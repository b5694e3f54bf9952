//! Single pass from tile coordinates to a finished scene graph.

use hexisle_materials::MaterialDesc;
use hexisle_mesh::{clouds, decoration, hex_prism};
use hexisle_terrain::{
    Decoration, DecorationKind, HexGrid, MaterialClass, NoiseField, RandomSource, SeededRandom,
    TileClassifier, TileCoord,
};

use crate::batches::TerrainBatches;
use crate::graph::{Renderable, SceneGraph};
use crate::params::SceneParams;
use crate::set_pieces;
use crate::stats::GenerationStats;

/// What happened to one candidate coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileOutcome {
    /// Farther from the origin than the cull radius.
    OutsideRadius,
    /// The height sample was NaN or infinite.
    NonFinite,
    Placed {
        class: MaterialClass,
        height: f32,
        decoration: Option<Decoration>,
    },
}

/// One generation session. Owns the per-class batches until [`finish`](Self::finish)
/// hands them to the scene graph.
pub struct SceneAssembler {
    params: SceneParams,
    noise: NoiseField,
    classifier: TileClassifier,
    batches: TerrainBatches,
    stats: GenerationStats,
}

impl SceneAssembler {
    pub fn new(params: SceneParams) -> Self {
        let noise = params.terrain.noise_field();
        let classifier = params.terrain.classifier(&params.decoration);
        Self {
            params,
            noise,
            classifier,
            batches: TerrainBatches::new(),
            stats: GenerationStats::default(),
        }
    }

    pub fn batches(&self) -> &TerrainBatches {
        &self.batches
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Cull, sample, classify and batch a single coordinate.
    pub fn add_tile(&mut self, coord: TileCoord, rng: &mut dyn RandomSource) -> TileOutcome {
        let position = self.params.terrain.grid.tile_to_position(coord);
        if !HexGrid::is_within_bounds(position, self.params.terrain.cull_radius) {
            self.stats.candidates += 1;
            self.stats.culled_by_radius += 1;
            return TileOutcome::OutsideRadius;
        }
        let noise_value = self.noise.sample(coord);
        self.place_tile(coord, noise_value, rng)
    }

    /// Batch an in-bounds tile from an already sampled `[0, 1]` noise value.
    pub fn place_tile(
        &mut self,
        coord: TileCoord,
        noise_value: f32,
        rng: &mut dyn RandomSource,
    ) -> TileOutcome {
        self.stats.candidates += 1;
        let Some(height) = self.noise.height_for(noise_value) else {
            tracing::warn!(?coord, noise_value, "Culling tile with non-finite height");
            self.stats.culled_non_finite += 1;
            return TileOutcome::NonFinite;
        };

        let position = self.params.terrain.grid.tile_to_position(coord);
        let class = self.classifier.classify(height);
        self.batches.add_tile(class, &hex_prism(height, position));
        self.stats.tiles[class.index()] += 1;

        let rolled = self.classifier.roll_decoration(class, rng);
        if let Some(Decoration { kind, target }) = rolled {
            let geometry = decoration(kind, height, position, &self.params.decoration, rng);
            self.batches.add_decoration(target, &geometry);
            match kind {
                DecorationKind::Rock => self.stats.rocks += 1,
                DecorationKind::TreeCluster => self.stats.trees += 1,
            }
        }

        TileOutcome::Placed {
            class,
            height,
            decoration: rolled,
        }
    }

    /// Visit every coordinate of the configured range, then finish.
    pub fn assemble(
        mut self,
        decorations: &mut dyn RandomSource,
        sky: &mut dyn RandomSource,
    ) -> SceneGraph {
        let range = self.params.terrain.range;
        let _span = tracing::info_span!("assemble", min = range.min, max = range.max).entered();
        for coord in range.iter() {
            self.add_tile(coord, decorations);
        }
        self.finish(sky)
    }

    /// Wrap the batches and set pieces into the final scene graph.
    ///
    /// Batches no tile reached stay empty rather than being dropped.
    pub fn finish(mut self, sky: &mut dyn RandomSource) -> SceneGraph {
        let max_height = self.params.terrain.max_height;
        let set = &self.params.set_pieces;
        let (cloud_layer, cloud_count) = clouds(&self.params.clouds, sky);
        self.stats.clouds = cloud_count;

        let geometries = self.batches.into_geometries();
        self.stats.vertices = geometries.each_ref().map(|g| g.vertex_count());
        self.stats.log_summary();

        let [stone, dirt, grass, sand, shallow] = geometries;
        SceneGraph {
            terrain: [
                Renderable::new(stone, MaterialDesc::terrain(MaterialClass::Stone)),
                Renderable::new(dirt, MaterialDesc::terrain(MaterialClass::Dirt)),
                Renderable::new(grass, MaterialDesc::terrain(MaterialClass::Grass)),
                Renderable::new(sand, MaterialDesc::terrain(MaterialClass::Sand)),
                Renderable::new(shallow, MaterialDesc::terrain(MaterialClass::Shallow)),
            ],
            water: Renderable::new(set_pieces::water(set, max_height), MaterialDesc::water()),
            basin_wall: Renderable::new(
                set_pieces::basin_wall(set, max_height),
                MaterialDesc::basin_wall(),
            ),
            basin_floor: Renderable::new(
                set_pieces::basin_floor(set, max_height),
                MaterialDesc::basin_floor(),
            ),
            clouds: Renderable::new(cloud_layer, MaterialDesc::cloud()),
            light: self.params.light,
            background: self.params.background,
            stats: self.stats,
        }
    }
}

/// Generate the island with decoration and cloud streams derived from `random_seed`.
pub fn generate(params: SceneParams, random_seed: u64) -> SceneGraph {
    let mut decorations = SeededRandom::for_stream(random_seed, "decorations");
    let mut sky = SeededRandom::for_stream(random_seed, "clouds");
    SceneAssembler::new(params).assemble(&mut decorations, &mut sky)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexisle_terrain::{ScriptedRandom, TileRange};

    fn small_params() -> SceneParams {
        let mut params = SceneParams::default();
        params.terrain.range = TileRange::new(-12, 12);
        params.terrain.cull_radius = 10.0;
        params
    }

    #[test]
    fn test_far_tile_is_culled() {
        let mut assembler = SceneAssembler::new(SceneParams::default());
        let mut rng = ScriptedRandom::constant(0.0);
        let outcome = assembler.add_tile(TileCoord::new(90, 0), &mut rng);
        assert_eq!(outcome, TileOutcome::OutsideRadius);
        assert_eq!(assembler.stats().culled_by_radius, 1);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_nan_height_is_culled_not_fatal() {
        let mut assembler = SceneAssembler::new(SceneParams::default());
        let mut rng = ScriptedRandom::constant(0.0);
        let outcome = assembler.place_tile(TileCoord::new(0, 0), f32::NAN, &mut rng);
        assert_eq!(outcome, TileOutcome::NonFinite);
        assert_eq!(assembler.stats().culled_non_finite, 1);
        assert_eq!(assembler.stats().surviving(), 0);
        for class in MaterialClass::ALL {
            assert!(assembler.batches().get(class).is_empty());
        }
    }

    #[test]
    fn test_tree_on_dirt_lands_in_grass_batch() {
        let mut assembler = SceneAssembler::new(SceneParams::default());
        // Always roll a decoration.
        let mut rng = ScriptedRandom::constant(0.0);
        let outcome = assembler.place_tile(TileCoord::new(0, 0), 0.75, &mut rng);

        let TileOutcome::Placed {
            class, decoration, ..
        } = outcome
        else {
            panic!("tile should be placed, got {outcome:?}");
        };
        assert_eq!(class, MaterialClass::Dirt);
        assert_eq!(decoration.map(|d| d.target), Some(MaterialClass::Grass));

        let batches = assembler.batches();
        assert_eq!(batches.tile_count(MaterialClass::Dirt), 1);
        assert_eq!(batches.get(MaterialClass::Dirt).vertex_count(), 40);
        assert_eq!(batches.tile_count(MaterialClass::Grass), 0);
        assert_eq!(batches.get(MaterialClass::Grass).vertex_count(), 45);
        assert_eq!(assembler.stats().trees, 1);
    }

    #[test]
    fn test_rock_on_sand_goes_to_stone_batch() {
        let mut assembler = SceneAssembler::new(SceneParams::default());
        let mut rng = ScriptedRandom::constant(0.0);
        assembler.place_tile(TileCoord::new(1, 1), 0.4, &mut rng);

        let batches = assembler.batches();
        assert_eq!(batches.tile_count(MaterialClass::Sand), 1);
        assert_eq!(batches.get(MaterialClass::Sand).vertex_count(), 40);
        assert_eq!(batches.tile_count(MaterialClass::Stone), 0);
        assert_eq!(batches.get(MaterialClass::Stone).vertex_count(), 64);
        assert_eq!(assembler.stats().rocks, 1);
    }

    #[test]
    fn test_grass_and_shallow_stay_bare() {
        let mut assembler = SceneAssembler::new(SceneParams::default());
        let mut rng = ScriptedRandom::constant(0.0);
        assembler.place_tile(TileCoord::new(0, 0), 0.6, &mut rng);
        assembler.place_tile(TileCoord::new(0, 1), 0.1, &mut rng);
        assert_eq!(rng.draws(), 0);
        assert_eq!(assembler.stats().tiles_in(MaterialClass::Grass), 1);
        assert_eq!(assembler.stats().tiles_in(MaterialClass::Shallow), 1);
    }

    #[test]
    fn test_finish_keeps_empty_batches() {
        let assembler = SceneAssembler::new(SceneParams::default());
        let scene = assembler.finish(&mut ScriptedRandom::constant(0.0));
        for class in MaterialClass::ALL {
            assert!(scene.terrain_batch(class).geometry.is_empty());
        }
        assert_eq!(scene.stats.clouds, 10);
        assert!(!scene.water.geometry.is_empty());
        assert!(!scene.clouds.geometry.is_empty());
    }

    #[test]
    fn test_terrain_batches_carry_their_materials() {
        let mut decorations = ScriptedRandom::constant(0.5);
        let mut sky = ScriptedRandom::constant(0.5);
        let scene = SceneAssembler::new(small_params()).assemble(&mut decorations, &mut sky);
        for class in MaterialClass::ALL {
            assert_eq!(scene.terrain_batch(class).material.name, class.name());
        }
        assert!(scene.water.material.transparent);
        assert!(scene.basin_wall.material.double_sided);
    }

    #[test]
    fn test_stats_vertices_match_batches() {
        let scene = generate(small_params(), 4);
        for class in MaterialClass::ALL {
            assert_eq!(
                scene.stats.vertices_in(class),
                scene.terrain_batch(class).geometry.vertex_count()
            );
        }
        assert_eq!(scene.stats.candidates, 24 * 24);
    }
}
