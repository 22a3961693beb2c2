//! Rectangle bin packing for texture atlases, glyph caches and sprite sheets.
//!
//! - Packers: Guillotine (choice + split + merge), MaxRects (BSSF/BLSF/BAF/BL/CP), Skyline (BL/MW + optional waste map)
//! - Atlas: `AtlasAllocator` grows pages on demand for online allocation
//! - Layout: `pack_layout` / `pack_auto` pack keyed sizes into pages; `export::to_json` serializes the result
//!
//! Quick example:
//! ```
//! use rectbin_core::prelude::*;
//!
//! let mut bin = MaxRectsBinPack::new(64, 64);
//! let r = bin.insert(16, 32, MaxRectsHeuristic::BestAreaFit).unwrap();
//! assert_eq!((r.x, r.y), (0, 0));
//!
//! let cfg = AtlasConfig::builder().with_page_size(128, 128).build();
//! let layout = pack_layout(vec![("a".to_string(), 40, 30), ("b".to_string(), 20, 20)], &cfg).unwrap();
//! assert_eq!(layout.pages.len(), 1);
//! ```

pub mod atlas;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod layout;
pub mod packer;

pub use atlas::*;
pub use config::*;
pub use error::*;
pub use geometry::*;
pub use layout::*;
pub use packer::*;

/// Convenience prelude for common types and functions.
/// Importing `rectbin_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::atlas::{Allocation, AtlasAllocator, AtlasStats};
    pub use crate::config::{
        Algorithm, AtlasConfig, AtlasConfigBuilder, FreeRectChoiceHeuristic,
        GuillotineSplitHeuristic, LevelChoiceHeuristic, MaxRectsHeuristic, SortOrder,
    };
    pub use crate::error::BinPackError;
    pub use crate::geometry::{Rect, RectSize};
    pub use crate::layout::{Layout, LayoutStats, Page, Placement, pack_auto, pack_layout};
    pub use crate::packer::{
        BinPacker, GuillotineBinPack, MaxRectsBinPack, SkylineBinPack, SkylineNode,
    };
}
