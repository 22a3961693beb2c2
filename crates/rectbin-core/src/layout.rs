use crate::atlas::AtlasAllocator;
use crate::config::{
    Algorithm, AtlasConfig, FreeRectChoiceHeuristic, GuillotineSplitHeuristic,
    LevelChoiceHeuristic, MaxRectsHeuristic, SortOrder,
};
use crate::error::{BinPackError, Result};
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A placed item within a page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Placement<K = String> {
    /// User-specified key (e.g., glyph id or asset path).
    pub key: K,
    /// Placed rectangle within the page (post-rotation width/height).
    pub rect: Rect,
    /// True if the item was rotated 90° when placed.
    pub rotated: bool,
}

/// A single page of a layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<K = String> {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    pub placements: Vec<Placement<K>>,
}

impl<K> Page<K> {
    /// Area of the bounding box of all placements, anchored at the page origin.
    pub fn extent_area(&self) -> u64 {
        let right = self.placements.iter().map(|p| p.rect.right()).max().unwrap_or(0);
        let bottom = self.placements.iter().map(|p| p.rect.bottom()).max().unwrap_or(0);
        (right as u64) * (bottom as u64)
    }
}

/// Pages produced by one packing run and the algorithm that produced them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layout<K = String> {
    pub pages: Vec<Page<K>>,
    pub algorithm: Algorithm,
}

/// Statistics about layout packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutStats {
    pub num_pages: usize,
    pub num_placements: usize,
    /// Sum of width * height over all pages.
    pub total_page_area: u64,
    /// Sum of placed rectangle areas.
    pub used_area: u64,
    /// Sum of per-page placement extents; smaller means tighter packing.
    pub extent_area: u64,
    /// used_area / total_page_area (0.0 to 1.0).
    pub occupancy: f64,
    pub num_rotated: usize,
}

impl<K> Layout<K> {
    /// Computes packing statistics for this layout.
    pub fn stats(&self) -> LayoutStats {
        let mut num_placements = 0;
        let mut total_page_area = 0u64;
        let mut used_area = 0u64;
        let mut extent_area = 0u64;
        let mut num_rotated = 0;

        for page in &self.pages {
            total_page_area += (page.width as u64) * (page.height as u64);
            extent_area += page.extent_area();
            for p in &page.placements {
                num_placements += 1;
                used_area += p.rect.area();
                if p.rotated {
                    num_rotated += 1;
                }
            }
        }

        let occupancy = if total_page_area > 0 {
            used_area as f64 / total_page_area as f64
        } else {
            0.0
        };

        LayoutStats {
            num_pages: self.pages.len(),
            num_placements,
            total_page_area,
            used_area,
            extent_area,
            occupancy,
            num_rotated,
        }
    }
}

impl LayoutStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Placements: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px², Rotated: {}",
            self.num_pages,
            self.num_placements,
            self.occupancy * 100.0,
            self.total_page_area,
            self.used_area,
            self.num_rotated,
        )
    }
}

/// Packs `(key, width, height)` items into pages with the configured algorithm.
///
/// Items are sorted by `cfg.sort_order` first (stable, so equal items keep input order)
/// and then allocated one by one through an `AtlasAllocator`.
#[instrument(skip_all)]
pub fn pack_layout<K: Clone + Ord>(items: Vec<(K, u32, u32)>, cfg: &AtlasConfig) -> Result<Layout<K>> {
    cfg.validate()?;
    if items.is_empty() {
        return Err(BinPackError::Empty);
    }
    let mut items = items;
    sort_items(&mut items, cfg.sort_order);

    let mut atlas = AtlasAllocator::new(cfg.clone())?;
    let mut pages: Vec<Page<K>> = Vec::new();
    for (key, w, h) in items {
        let a = atlas.allocate(w, h)?;
        while pages.len() <= a.page {
            pages.push(Page {
                id: pages.len(),
                width: cfg.page_width,
                height: cfg.page_height,
                placements: Vec::new(),
            });
        }
        pages[a.page].placements.push(Placement {
            key,
            rect: a.rect,
            rotated: a.rotated,
        });
    }
    debug!(
        algorithm = %cfg.algorithm.label(),
        pages = pages.len(),
        "layout packed"
    );
    Ok(Layout {
        pages,
        algorithm: cfg.algorithm,
    })
}

/// Candidate algorithms tried by `pack_auto`, configured algorithm first.
pub fn portfolio(configured: Algorithm) -> Vec<Algorithm> {
    let mut candidates = vec![
        configured,
        Algorithm::skyline(LevelChoiceHeuristic::MinWasteFit, true),
        Algorithm::maxrects(MaxRectsHeuristic::BestAreaFit),
        Algorithm::maxrects(MaxRectsHeuristic::BottomLeft),
        Algorithm::maxrects(MaxRectsHeuristic::ContactPoint),
        Algorithm::Guillotine {
            merge: true,
            choice: FreeRectChoiceHeuristic::BestAreaFit,
            split: GuillotineSplitHeuristic::ShorterLeftoverAxis,
        },
    ];
    let mut seen = Vec::with_capacity(candidates.len());
    candidates.retain(|a| {
        if seen.contains(a) {
            false
        } else {
            seen.push(*a);
            true
        }
    });
    candidates
}

/// Tries every algorithm of the `portfolio` and keeps the best layout: fewest pages
/// first, then the smallest total placement extent. Ties keep the earlier candidate.
///
/// `time_budget_ms` stops the sequential search once exceeded (the first candidate
/// always runs). With the `parallel` feature and `cfg.parallel`, all candidates run
/// on the rayon pool instead. If every candidate fails, the first error is returned.
#[instrument(skip_all)]
pub fn pack_auto<K: Clone + Ord + Send + Sync>(
    items: Vec<(K, u32, u32)>,
    cfg: &AtlasConfig,
) -> Result<Layout<K>> {
    cfg.validate()?;
    if items.is_empty() {
        return Err(BinPackError::Empty);
    }
    let candidates: Vec<AtlasConfig> = portfolio(cfg.algorithm)
        .into_iter()
        .map(|algorithm| AtlasConfig {
            algorithm,
            ..cfg.clone()
        })
        .collect();

    // Parallel path (optional)
    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            let results: Vec<Result<Layout<K>>> = candidates
                .par_iter()
                .map(|cand| pack_layout(items.clone(), cand))
                .collect();
            return pick_best(results);
        }
    }

    // Sequential path with optional time budget
    let budget_ms = cfg.time_budget_ms.unwrap_or(0);
    let start = Instant::now();
    let mut results = Vec::with_capacity(candidates.len());
    for cand in &candidates {
        if budget_ms > 0 && !results.is_empty() && start.elapsed().as_millis() as u64 > budget_ms {
            debug!(tried = results.len(), "auto portfolio stopped by time budget");
            break;
        }
        results.push(pack_layout(items.clone(), cand));
    }
    pick_best(results)
}

fn pick_best<K>(results: Vec<Result<Layout<K>>>) -> Result<Layout<K>> {
    let mut best: Option<(Layout<K>, usize, u64)> = None;
    let mut first_err = None;
    for res in results {
        match res {
            Ok(layout) => {
                let stats = layout.stats();
                let better = match &best {
                    None => true,
                    Some((_, pages, extent)) => {
                        stats.num_pages < *pages
                            || (stats.num_pages == *pages && stats.extent_area < *extent)
                    }
                };
                if better {
                    best = Some((layout, stats.num_pages, stats.extent_area));
                }
            }
            Err(e) => {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
    }
    match best {
        Some((layout, pages, _)) => {
            debug!(algorithm = %layout.algorithm.label(), pages, "auto portfolio winner");
            Ok(layout)
        }
        None => Err(first_err.unwrap_or(BinPackError::Empty)),
    }
}

fn sort_items<K: Ord>(items: &mut [(K, u32, u32)], order: SortOrder) {
    let area = |w: u32, h: u32| (w as u64) * (h as u64);
    match order {
        SortOrder::AreaDesc => items.sort_by(|a, b| area(b.1, b.2).cmp(&area(a.1, a.2))),
        SortOrder::MaxSideDesc => items.sort_by(|a, b| b.1.max(b.2).cmp(&a.1.max(a.2))),
        SortOrder::HeightDesc => items.sort_by(|a, b| b.2.cmp(&a.2)),
        SortOrder::WidthDesc => items.sort_by(|a, b| b.1.cmp(&a.1)),
        SortOrder::KeyAsc => items.sort_by(|a, b| a.0.cmp(&b.0)),
        SortOrder::None => {}
    }
}
