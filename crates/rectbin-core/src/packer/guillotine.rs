use crate::config::{FreeRectChoiceHeuristic, GuillotineSplitHeuristic};
use crate::geometry::{Rect, RectSize, fits, fits_perfectly};

/// Guillotine packer: keeps a list of pairwise disjoint free rectangles and cuts the
/// chosen one in two after every placement.
#[derive(Debug, Clone)]
pub struct GuillotineBinPack {
    bin_width: u32,
    bin_height: u32,
    free: Vec<Rect>,
    used: Vec<Rect>,
}

impl GuillotineBinPack {
    pub fn new(width: u32, height: u32) -> Self {
        let mut bin = Self {
            bin_width: 0,
            bin_height: 0,
            free: Vec::new(),
            used: Vec::new(),
        };
        bin.init(width, height);
        bin
    }

    /// A bin of the given size with no free space at all. Free area is handed in
    /// later through `add_free_rectangle` (the skyline waste map works this way).
    pub(crate) fn without_free_space(width: u32, height: u32) -> Self {
        let mut bin = Self::new(width, height);
        bin.free.clear();
        bin
    }

    /// Discards all placements and resets free space to the whole bin.
    pub fn init(&mut self, width: u32, height: u32) {
        self.bin_width = width;
        self.bin_height = height;
        self.used.clear();
        self.free.clear();
        if width > 0 && height > 0 {
            self.free.push(Rect::new(0, 0, width, height));
        }
    }

    pub fn bin_width(&self) -> u32 {
        self.bin_width
    }

    pub fn bin_height(&self) -> u32 {
        self.bin_height
    }

    pub fn free_rectangles(&self) -> &[Rect] {
        &self.free
    }

    pub fn used_rectangles(&self) -> &[Rect] {
        &self.used
    }

    /// Places a single `width x height` item, possibly rotated by 90°.
    ///
    /// Returns `None` without touching any state when no free rectangle can hold the
    /// item in either orientation. Zero-sized items are never placed.
    pub fn insert(
        &mut self,
        width: u32,
        height: u32,
        merge: bool,
        choice: FreeRectChoiceHeuristic,
        split: GuillotineSplitHeuristic,
    ) -> Option<Rect> {
        if width == 0 || height == 0 {
            return None;
        }
        let (idx, node) = self.find_position(width, height, choice)?;
        self.place(idx, node, merge, split);
        Some(node)
    }

    /// Packs as many of `items` as possible, best pairing first.
    ///
    /// Every round scores all (free rectangle, item) pairs and places the global best;
    /// an exact fit anywhere ends the scan early. Placed items are removed from `items`
    /// and their rectangles appended to `dst` in placement order. Stops at the first
    /// round where nothing fits, leaving the rest in `items`.
    pub fn insert_batch(
        &mut self,
        items: &mut Vec<RectSize>,
        dst: &mut Vec<Rect>,
        merge: bool,
        choice: FreeRectChoiceHeuristic,
        split: GuillotineSplitHeuristic,
    ) {
        while !items.is_empty() {
            let mut best: Option<(usize, usize, bool)> = None;
            let mut best_score = i128::MAX;
            'scan: for (i, fr) in self.free.iter().enumerate() {
                for (j, item) in items.iter().enumerate() {
                    if item.w == 0 || item.h == 0 {
                        continue;
                    }
                    if fits_perfectly(*item, fr) {
                        best = Some((i, j, item.w != fr.w || item.h != fr.h));
                        break 'scan;
                    }
                    if fits(*item, fr) {
                        let flipped = item.w > fr.w || item.h > fr.h;
                        let oriented = if flipped { item.rotated() } else { *item };
                        let s = score_by_heuristic(oriented.w, oriented.h, fr, choice);
                        if s < best_score {
                            best_score = s;
                            best = Some((i, j, flipped));
                        }
                    }
                }
            }

            let Some((free_idx, item_idx, flipped)) = best else {
                return;
            };
            let fr = self.free[free_idx];
            let item = items.remove(item_idx);
            let node = if flipped {
                Rect::new(fr.x, fr.y, item.h, item.w)
            } else {
                Rect::new(fr.x, fr.y, item.w, item.h)
            };
            self.place(free_idx, node, merge, split);
            dst.push(node);
        }
    }

    /// Ratio of placed area to bin area.
    pub fn occupancy(&self) -> f64 {
        let bin_area = (self.bin_width as u64) * (self.bin_height as u64);
        if bin_area == 0 {
            return 0.0;
        }
        let used: u64 = self.used.iter().map(Rect::area).sum();
        used as f64 / bin_area as f64
    }

    /// One merge pass over the free list: joins pairs that share a full edge.
    ///
    /// A single pass can miss merges that only become possible after a later pair was
    /// joined; see `merge_free_list_to_fixpoint`. Returns true if anything merged.
    pub fn merge_free_list(&mut self) -> bool {
        let mut merged = false;
        let mut i = 0;
        while i < self.free.len() {
            let mut j = i + 1;
            while j < self.free.len() {
                let a = self.free[i];
                let b = self.free[j];
                let mut joined = None;
                if a.w == b.w && a.x == b.x {
                    if a.y == b.bottom() {
                        joined = Some(Rect::new(a.x, b.y, a.w, a.h + b.h));
                    } else if a.bottom() == b.y {
                        joined = Some(Rect::new(a.x, a.y, a.w, a.h + b.h));
                    }
                } else if a.h == b.h && a.y == b.y {
                    if a.x == b.right() {
                        joined = Some(Rect::new(b.x, a.y, a.w + b.w, a.h));
                    } else if a.right() == b.x {
                        joined = Some(Rect::new(a.x, a.y, a.w + b.w, a.h));
                    }
                }
                if let Some(r) = joined {
                    self.free[i] = r;
                    self.free.remove(j);
                    merged = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
        merged
    }

    /// Repeats merge passes until one of them changes nothing.
    pub fn merge_free_list_to_fixpoint(&mut self) {
        while self.merge_free_list() {}
    }

    /// Returns a previously placed rectangle to the free list.
    ///
    /// Returns false and changes nothing if `rect` is not one of the used rectangles.
    pub fn free(&mut self, rect: &Rect) -> bool {
        let Some(pos) = self.used.iter().position(|u| u == rect) else {
            return false;
        };
        self.used.remove(pos);
        self.free.push(*rect);
        self.merge_free_list();
        true
    }

    /// Adds free area that the caller knows to be unoccupied and disjoint from the
    /// current free list.
    pub(crate) fn add_free_rectangle(&mut self, rect: Rect) {
        if !rect.is_empty() {
            self.free.push(rect);
        }
    }

    fn find_position(
        &self,
        width: u32,
        height: u32,
        choice: FreeRectChoiceHeuristic,
    ) -> Option<(usize, Rect)> {
        let mut best = None;
        let mut best_score = i128::MAX;
        let size = RectSize::new(width, height);
        for (i, fr) in self.free.iter().enumerate() {
            if fits_perfectly(size, fr) {
                return Some((i, Rect::new(fr.x, fr.y, fr.w, fr.h)));
            }
            if fits(size, fr) {
                let oriented = if width <= fr.w && height <= fr.h {
                    size
                } else {
                    size.rotated()
                };
                let s = score_by_heuristic(oriented.w, oriented.h, fr, choice);
                if s < best_score {
                    best_score = s;
                    best = Some((i, Rect::new(fr.x, fr.y, oriented.w, oriented.h)));
                }
            }
        }
        best
    }

    fn place(&mut self, idx: usize, node: Rect, merge: bool, split: GuillotineSplitHeuristic) {
        let fr = self.free.remove(idx);
        let (bottom, right) = split_along_axis(&fr, &node, split_horizontal(&fr, &node, split));
        if let Some(r) = bottom {
            self.free.push(r);
        }
        if let Some(r) = right {
            self.free.push(r);
        }
        if merge {
            self.merge_free_list();
        }
        self.used.push(node);
    }
}

/// Scores placing a `w x h` item (orientation already chosen) into `free`.
/// Smaller is better for every heuristic.
pub fn score_by_heuristic(w: u32, h: u32, free: &Rect, choice: FreeRectChoiceHeuristic) -> i128 {
    match choice {
        FreeRectChoiceHeuristic::BestAreaFit => score_best_area_fit(w, h, free),
        FreeRectChoiceHeuristic::BestShortSideFit => score_best_short_side_fit(w, h, free),
        FreeRectChoiceHeuristic::BestLongSideFit => score_best_long_side_fit(w, h, free),
        FreeRectChoiceHeuristic::WorstAreaFit => -score_best_area_fit(w, h, free),
        FreeRectChoiceHeuristic::WorstShortSideFit => -score_best_short_side_fit(w, h, free),
        FreeRectChoiceHeuristic::WorstLongSideFit => -score_best_long_side_fit(w, h, free),
    }
}

/// Leftover area of `free` after the item. Negative when the item is larger.
pub fn score_best_area_fit(w: u32, h: u32, free: &Rect) -> i128 {
    free.area() as i128 - RectSize::new(w, h).area() as i128
}

pub fn score_best_short_side_fit(w: u32, h: u32, free: &Rect) -> i128 {
    let (leftover_h, leftover_v) = leftovers(w, h, free);
    leftover_h.min(leftover_v)
}

pub fn score_best_long_side_fit(w: u32, h: u32, free: &Rect) -> i128 {
    let (leftover_h, leftover_v) = leftovers(w, h, free);
    leftover_h.max(leftover_v)
}

fn leftovers(w: u32, h: u32, free: &Rect) -> (i128, i128) {
    (
        (free.w as i128 - w as i128).abs(),
        (free.h as i128 - h as i128).abs(),
    )
}

/// Decides whether the leftover of `free` after placing `placed` at its top-left corner
/// is cut horizontally (true) or vertically (false).
pub fn split_horizontal(free: &Rect, placed: &Rect, method: GuillotineSplitHeuristic) -> bool {
    let w = free.w.saturating_sub(placed.w) as u64;
    let h = free.h.saturating_sub(placed.h) as u64;
    let (pw, ph) = (placed.w as u64, placed.h as u64);
    match method {
        GuillotineSplitHeuristic::ShorterLeftoverAxis => w <= h,
        GuillotineSplitHeuristic::LongerLeftoverAxis => w > h,
        GuillotineSplitHeuristic::MinimizeArea => pw * h > w * ph,
        GuillotineSplitHeuristic::MaximizeArea => pw * h <= w * ph,
        GuillotineSplitHeuristic::ShorterAxis => free.w <= free.h,
        GuillotineSplitHeuristic::LongerAxis => free.w > free.h,
    }
}

/// Cuts the leftover of `free` into a bottom and a right rectangle.
///
/// A horizontal cut gives the bottom piece the full free width; a vertical cut gives
/// the right piece the full free height. Degenerate pieces come back as `None`.
pub fn split_along_axis(
    free: &Rect,
    placed: &Rect,
    horizontal: bool,
) -> (Option<Rect>, Option<Rect>) {
    let mut bottom = Rect::new(
        free.x,
        free.y + placed.h,
        0,
        free.h.saturating_sub(placed.h),
    );
    let mut right = Rect::new(
        free.x + placed.w,
        free.y,
        free.w.saturating_sub(placed.w),
        0,
    );
    if horizontal {
        bottom.w = free.w;
        right.h = placed.h;
    } else {
        bottom.w = placed.w;
        right.h = free.h;
    }
    let bottom = if bottom.is_empty() { None } else { Some(bottom) };
    let right = if right.is_empty() { None } else { Some(right) };
    (bottom, right)
}
