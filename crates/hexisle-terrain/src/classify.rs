//! Height banding and the decoration roll.

use std::fmt;

use crate::random::RandomSource;

/// Material band of a tile. Each class owns exactly one terrain batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaterialClass {
    Stone,
    Dirt,
    Grass,
    Sand,
    Shallow,
}

impl MaterialClass {
    /// Every class, highest band first.
    pub const ALL: [MaterialClass; 5] = [
        MaterialClass::Stone,
        MaterialClass::Dirt,
        MaterialClass::Grass,
        MaterialClass::Sand,
        MaterialClass::Shallow,
    ];

    /// Dense index into `ALL`, for per-class arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            MaterialClass::Stone => "stone",
            MaterialClass::Dirt => "dirt",
            MaterialClass::Grass => "grass",
            MaterialClass::Sand => "sand",
            MaterialClass::Shallow => "shallow",
        }
    }
}

impl fmt::Display for MaterialClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lower edges of the bands as fractions of the maximum height.
///
/// A height must be strictly above a threshold to enter that band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandThresholds {
    pub stone: f32,
    pub dirt: f32,
    pub grass: f32,
    pub sand: f32,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            stone: 0.8,
            dirt: 0.7,
            grass: 0.5,
            sand: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    Rock,
    TreeCluster,
}

/// A decoration chosen for a tile, with the batch its geometry goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub target: MaterialClass,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileClassifier {
    max_height: f32,
    bands: BandThresholds,
    decoration_probability: f32,
}

impl TileClassifier {
    pub fn new(max_height: f32, bands: BandThresholds, decoration_probability: f32) -> Self {
        Self {
            max_height,
            bands,
            decoration_probability,
        }
    }

    pub fn classify(&self, height: f32) -> MaterialClass {
        let b = &self.bands;
        let m = self.max_height;
        if height > b.stone * m {
            MaterialClass::Stone
        } else if height > b.dirt * m {
            MaterialClass::Dirt
        } else if height > b.grass * m {
            MaterialClass::Grass
        } else if height > b.sand * m {
            MaterialClass::Sand
        } else {
            MaterialClass::Shallow
        }
    }

    /// Roll for a decoration on a tile of class `class`.
    ///
    /// Stone and sand tiles may get a rock, always drawn with the stone
    /// material. Dirt tiles may get a tree cluster, drawn with the grass
    /// material. Grass and shallow tiles never roll, so they draw nothing
    /// from `rng`.
    pub fn roll_decoration(
        &self,
        class: MaterialClass,
        rng: &mut dyn RandomSource,
    ) -> Option<Decoration> {
        let (kind, target) = match class {
            MaterialClass::Stone | MaterialClass::Sand => {
                (DecorationKind::Rock, MaterialClass::Stone)
            }
            MaterialClass::Dirt => (DecorationKind::TreeCluster, MaterialClass::Grass),
            MaterialClass::Grass | MaterialClass::Shallow => return None,
        };
        rng.chance(self.decoration_probability)
            .then_some(Decoration { kind, target })
    }
}
