use crate::config::AtlasConfig;
use crate::error::{BinPackError, Result};
use crate::geometry::{Rect, RectSize};
use crate::packer::BinPacker;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Where an allocation landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Index of the page holding the allocation.
    pub page: usize,
    /// Content rectangle within the page (post-rotation width/height, padding excluded).
    pub rect: Rect,
    /// True if the item was turned by 90° to fit.
    pub rotated: bool,
}

/// Statistics about atlas usage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtlasStats {
    pub num_pages: usize,
    pub num_allocations: usize,
    /// Sum of all page areas.
    pub total_area: u64,
    /// Sum of allocated content areas (padding excluded).
    pub used_area: u64,
    /// `used_area / total_area` (0.0 to 1.0).
    pub occupancy: f64,
}

impl AtlasStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Allocations: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px²",
            self.num_pages,
            self.num_allocations,
            self.occupancy * 100.0,
            self.total_area,
            self.used_area,
        )
    }

    pub fn wasted_area(&self) -> u64 {
        self.total_area.saturating_sub(self.used_area)
    }
}

/// Multi-page allocator: asks each open page for room and opens a new page when
/// every page refuses the item.
///
/// Typical consumer is a glyph or sprite cache that uploads each new bitmap to the
/// returned sub-rectangle of a shared texture.
#[derive(Debug, Clone)]
pub struct AtlasAllocator {
    cfg: AtlasConfig,
    pages: Vec<AtlasPage>,
}

#[derive(Debug, Clone)]
struct AtlasPage {
    packer: BinPacker,
    allocations: usize,
    used_area: u64,
}

impl AtlasAllocator {
    /// Validates `cfg` and creates an allocator with no pages yet.
    pub fn new(cfg: AtlasConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            pages: Vec::new(),
        })
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.cfg
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn allocation_count(&self) -> usize {
        self.pages.iter().map(|p| p.allocations).sum()
    }

    /// Occupancy of one page as seen by its packer (padding included).
    pub fn page_occupancy(&self, page: usize) -> Option<f64> {
        self.pages.get(page).map(|p| p.packer.occupancy())
    }

    /// Reserves room for a `w x h` item, opening a new page if no open page has room.
    pub fn allocate(&mut self, w: u32, h: u32) -> Result<Allocation> {
        if w == 0 || h == 0 {
            return Err(BinPackError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        let slot = RectSize::new(
            w.saturating_add(self.cfg.padding),
            h.saturating_add(self.cfg.padding),
        );
        let (pw, ph) = (self.cfg.page_width, self.cfg.page_height);
        let fits_empty = (slot.w <= pw && slot.h <= ph) || (slot.h <= pw && slot.w <= ph);
        if !fits_empty {
            return Err(BinPackError::TooLarge {
                width: w,
                height: h,
            });
        }

        // Try existing pages
        for idx in 0..self.pages.len() {
            if let Some(placed) = self.pages[idx].packer.insert(slot) {
                return Ok(self.record(idx, placed, slot, w, h));
            }
        }

        // Grow: add a new page and place
        if let Some(max) = self.cfg.max_pages {
            if self.pages.len() >= max {
                debug!(max, "atlas refused allocation: page limit reached");
                return Err(BinPackError::OutOfPages { max });
            }
        }
        let mut packer = BinPacker::new(pw, ph, self.cfg.algorithm);
        let placed = packer.insert(slot).ok_or(BinPackError::TooLarge {
            width: w,
            height: h,
        })?;
        debug!(
            page = self.pages.len(),
            width = pw,
            height = ph,
            "opened atlas page"
        );
        self.pages.push(AtlasPage {
            packer,
            allocations: 0,
            used_area: 0,
        });
        let idx = self.pages.len() - 1;
        Ok(self.record(idx, placed, slot, w, h))
    }

    /// Drops every page.
    pub fn clear(&mut self) {
        self.pages.clear();
    }

    pub fn stats(&self) -> AtlasStats {
        let page_area = (self.cfg.page_width as u64) * (self.cfg.page_height as u64);
        let total_area = page_area * self.pages.len() as u64;
        let used_area: u64 = self.pages.iter().map(|p| p.used_area).sum();
        let occupancy = if total_area > 0 {
            used_area as f64 / total_area as f64
        } else {
            0.0
        };
        AtlasStats {
            num_pages: self.pages.len(),
            num_allocations: self.allocation_count(),
            total_area,
            used_area,
            occupancy,
        }
    }

    fn record(&mut self, idx: usize, placed: Rect, slot: RectSize, w: u32, h: u32) -> Allocation {
        let rotated = placed.w != slot.w || placed.h != slot.h;
        let (cw, ch) = if rotated { (h, w) } else { (w, h) };
        let page = &mut self.pages[idx];
        page.allocations += 1;
        page.used_area += (w as u64) * (h as u64);
        let rect = Rect::new(placed.x, placed.y, cw, ch);
        trace!(page = idx, ?rect, rotated, "allocated");
        Allocation {
            page: idx,
            rect,
            rotated,
        }
    }
}
