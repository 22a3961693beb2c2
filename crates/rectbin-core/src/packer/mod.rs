use crate::config::{
    Algorithm, FreeRectChoiceHeuristic, GuillotineSplitHeuristic, LevelChoiceHeuristic,
    MaxRectsHeuristic,
};
use crate::geometry::{Rect, RectSize};

pub mod guillotine;
pub mod maxrects;
pub mod skyline;

pub use guillotine::GuillotineBinPack;
pub use maxrects::MaxRectsBinPack;
pub use skyline::{SkylineBinPack, SkylineNode};

/// One bin driven by a fixed `Algorithm`.
///
/// Wraps the three packers behind a single `insert` so callers (the atlas allocator,
/// the layout API) can pick the family at runtime.
#[derive(Debug, Clone)]
pub enum BinPacker {
    Guillotine {
        bin: GuillotineBinPack,
        merge: bool,
        choice: FreeRectChoiceHeuristic,
        split: GuillotineSplitHeuristic,
    },
    MaxRects {
        bin: MaxRectsBinPack,
        heuristic: MaxRectsHeuristic,
    },
    Skyline {
        bin: SkylineBinPack,
        heuristic: LevelChoiceHeuristic,
    },
}

impl BinPacker {
    pub fn new(width: u32, height: u32, algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Guillotine {
                merge,
                choice,
                split,
            } => Self::Guillotine {
                bin: GuillotineBinPack::new(width, height),
                merge,
                choice,
                split,
            },
            Algorithm::MaxRects { heuristic } => Self::MaxRects {
                bin: MaxRectsBinPack::new(width, height),
                heuristic,
            },
            Algorithm::Skyline {
                heuristic,
                use_waste_map,
            } => Self::Skyline {
                bin: SkylineBinPack::new(width, height, use_waste_map),
                heuristic,
            },
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Guillotine {
                merge,
                choice,
                split,
                ..
            } => Algorithm::Guillotine {
                merge: *merge,
                choice: *choice,
                split: *split,
            },
            Self::MaxRects { heuristic, .. } => Algorithm::MaxRects {
                heuristic: *heuristic,
            },
            Self::Skyline { bin, heuristic } => Algorithm::Skyline {
                heuristic: *heuristic,
                use_waste_map: bin.waste_map().is_some(),
            },
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Self::Guillotine { bin, .. } => bin.bin_width(),
            Self::MaxRects { bin, .. } => bin.bin_width(),
            Self::Skyline { bin, .. } => bin.bin_width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Guillotine { bin, .. } => bin.bin_height(),
            Self::MaxRects { bin, .. } => bin.bin_height(),
            Self::Skyline { bin, .. } => bin.bin_height(),
        }
    }

    /// Places one item with the configured heuristics. `None` means it did not fit.
    pub fn insert(&mut self, size: RectSize) -> Option<Rect> {
        match self {
            Self::Guillotine {
                bin,
                merge,
                choice,
                split,
            } => bin.insert(size.w, size.h, *merge, *choice, *split),
            Self::MaxRects { bin, heuristic } => bin.insert(size.w, size.h, *heuristic),
            Self::Skyline { bin, heuristic } => bin.insert(size.w, size.h, *heuristic),
        }
    }

    /// Batch insert with the configured heuristics; see the per-packer `insert_batch`.
    pub fn insert_batch(&mut self, items: &mut Vec<RectSize>, dst: &mut Vec<Rect>) {
        match self {
            Self::Guillotine {
                bin,
                merge,
                choice,
                split,
            } => bin.insert_batch(items, dst, *merge, *choice, *split),
            Self::MaxRects { bin, heuristic } => bin.insert_batch(items, dst, *heuristic),
            Self::Skyline { bin, heuristic } => bin.insert_batch(items, dst, *heuristic),
        }
    }

    pub fn occupancy(&self) -> f64 {
        match self {
            Self::Guillotine { bin, .. } => bin.occupancy(),
            Self::MaxRects { bin, .. } => bin.occupancy(),
            Self::Skyline { bin, .. } => bin.occupancy(),
        }
    }
}
