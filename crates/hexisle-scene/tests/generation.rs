//! Whole-island generation at the reference settings.

use hexisle_scene::{SceneAssembler, SceneParams, TileOutcome, generate};
use hexisle_terrain::{HexGrid, MaterialClass, SeededRandom};

fn reference_survivors(params: &SceneParams) -> usize {
    params
        .terrain
        .range
        .iter()
        .filter(|&coord| {
            let p = params.terrain.grid.tile_to_position(coord);
            p.distance_from_origin() <= params.terrain.cull_radius
        })
        .count()
}

#[test]
fn survivors_match_brute_force_count() {
    let params = SceneParams::default();
    let expected = reference_survivors(&params);
    let scene = generate(params, 1);

    assert_eq!(scene.stats.surviving(), expected);
    assert_eq!(scene.stats.candidates, 200 * 200);
    assert_eq!(
        scene.stats.culled_by_radius + scene.stats.culled_non_finite + expected,
        200 * 200
    );
    // Roughly pi * 45^2 / (1.77 * 1.535) tiles.
    assert!((2200..2500).contains(&expected), "{expected} survivors");
}

#[test]
fn every_survivor_lands_in_exactly_one_batch() {
    let params = SceneParams::default();
    let mut assembler = SceneAssembler::new(params.clone());
    let mut rng = SeededRandom::new(2);

    let mut placed = [0usize; 5];
    for coord in params.terrain.range.iter() {
        match assembler.add_tile(coord, &mut rng) {
            TileOutcome::Placed { class, .. } => placed[class.index()] += 1,
            TileOutcome::OutsideRadius => {
                let p = params.terrain.grid.tile_to_position(coord);
                assert!(!HexGrid::is_within_bounds(p, 45.0));
            }
            TileOutcome::NonFinite => panic!("simplex noise produced a non-finite sample"),
        }
    }

    for class in MaterialClass::ALL {
        assert_eq!(assembler.batches().tile_count(class), placed[class.index()]);
    }
    assert_eq!(placed.iter().sum::<usize>(), reference_survivors(&params));
}

#[test]
fn same_seeds_give_identical_batches() {
    let a = generate(SceneParams::default(), 99);
    let b = generate(SceneParams::default(), 99);

    assert_eq!(a.stats, b.stats);
    for class in MaterialClass::ALL {
        let ga = &a.terrain_batch(class).geometry;
        let gb = &b.terrain_batch(class).geometry;
        assert_eq!(ga.vertex_count(), gb.vertex_count(), "{class}");
        assert_eq!(ga, gb, "{class} batch differs between runs");
    }
    assert_eq!(a.clouds.geometry, b.clouds.geometry);
}

#[test]
fn random_seed_changes_decorations_only() {
    let a = generate(SceneParams::default(), 1);
    let b = generate(SceneParams::default(), 2);

    assert_eq!(a.stats.tiles, b.stats.tiles);
    assert_eq!(a.stats.culled_by_radius, b.stats.culled_by_radius);
    // Tiles are noise-driven; only decoration geometry may differ.
    assert_eq!(
        a.terrain_batch(MaterialClass::Shallow).geometry,
        b.terrain_batch(MaterialClass::Shallow).geometry
    );
}

#[test]
fn reference_island_is_banded_and_decorated() {
    let scene = generate(SceneParams::default(), 5);
    let stats = &scene.stats;

    let bands = MaterialClass::ALL
        .iter()
        .filter(|&&class| stats.tiles_in(class) > 0)
        .count();
    assert!(bands >= 3, "only {bands} bands populated: {:?}", stats.tiles);
    assert!(stats.rocks + stats.trees > 0);
    assert!((10..20).contains(&stats.clouds));

    // Tree clusters never add dirt vertices: dirt holds prisms only.
    assert_eq!(
        stats.vertices_in(MaterialClass::Dirt),
        stats.tiles_in(MaterialClass::Dirt) * 40
    );
    assert_eq!(
        stats.vertices_in(MaterialClass::Grass),
        stats.tiles_in(MaterialClass::Grass) * 40 + stats.trees * 45
    );
    // Every rock lands in the stone batch, even those rolled on sand.
    assert_eq!(
        stats.vertices_in(MaterialClass::Sand),
        stats.tiles_in(MaterialClass::Sand) * 40
    );
    assert_eq!(
        stats.vertices_in(MaterialClass::Stone),
        stats.tiles_in(MaterialClass::Stone) * 40 + stats.rocks * 64
    );
}

#[test]
fn zero_probability_disables_decorations() {
    let mut params = SceneParams::default();
    params.decoration.probability = 0.0;
    let scene = generate(params, 3);
    assert_eq!(scene.stats.rocks + scene.stats.trees, 0);
    for class in MaterialClass::ALL {
        assert_eq!(scene.stats.vertices_in(class), scene.stats.tiles_in(class) * 40);
    }
}
