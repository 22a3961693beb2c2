use super::guillotine::{score_best_area_fit, score_best_long_side_fit, score_best_short_side_fit};
use crate::config::MaxRectsHeuristic;
use crate::geometry::{Rect, RectSize, common_interval_length, fits, fits_perfectly, is_contained_in};

/// MaxRects packer: tracks every maximal free rectangle of the bin. Free rectangles
/// may overlap each other; none is contained in another after a placement.
#[derive(Debug, Clone)]
pub struct MaxRectsBinPack {
    bin_width: u32,
    bin_height: u32,
    free: Vec<Rect>,
    used: Vec<Rect>,
}

impl MaxRectsBinPack {
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
    /// Returns `None` and leaves the bin untouched when it fits nowhere.
    pub fn insert(&mut self, width: u32, height: u32, method: MaxRectsHeuristic) -> Option<Rect> {
        let (node, _, _) = self.score_rect(width, height, method)?;
        self.place_rect(node);
        Some(node)
    }

    /// Packs as many of `items` as possible; each round places the item whose best
    /// position scores lowest. Placed items leave `items`; their rectangles are
    /// appended to `dst`.
    pub fn insert_batch(
        &mut self,
        items: &mut Vec<RectSize>,
        dst: &mut Vec<Rect>,
        method: MaxRectsHeuristic,
    ) {
        while !items.is_empty() {
            let mut best: Option<(usize, Rect)> = None;
            let mut best_score = (i128::MAX, i128::MAX);
            for (i, item) in items.iter().enumerate() {
                if let Some((node, s1, s2)) = self.score_rect(item.w, item.h, method) {
                    if best.is_none() || (s1, s2) < best_score {
                        best_score = (s1, s2);
                        best = Some((i, node));
                    }
                }
            }
            let Some((idx, node)) = best else {
                return;
            };
            self.place_rect(node);
            dst.push(node);
            items.remove(idx);
        }
    }

    pub fn occupancy(&self) -> f64 {
        let bin_area = (self.bin_width as u64) * (self.bin_height as u64);
        if bin_area == 0 {
            return 0.0;
        }
        let used: u64 = self.used.iter().map(Rect::area).sum();
        used as f64 / bin_area as f64
    }

    /// Removes every free rectangle that lies inside another one.
    pub fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let mut removed_i = false;
            let mut j = i + 1;
            while j < self.free.len() {
                if is_contained_in(&self.free[i], &self.free[j]) {
                    self.free.remove(i);
                    removed_i = true;
                    break;
                }
                if is_contained_in(&self.free[j], &self.free[i]) {
                    self.free.remove(j);
                } else {
                    j += 1;
                }
            }
            if !removed_i {
                i += 1;
            }
        }
    }

    /// Returns a previously placed rectangle to free space.
    ///
    /// The area is added as one free rectangle, so the list is no longer guaranteed
    /// to be maximal until later placements split it. Returns false if `rect` is not
    /// a used rectangle.
    pub fn free(&mut self, rect: &Rect) -> bool {
        let Some(pos) = self.used.iter().position(|u| u == rect) else {
            return false;
        };
        self.used.remove(pos);
        self.free.push(*rect);
        self.prune_free_list();
        true
    }

    /// Contact perimeter of `node` with the bin edges and the placed rectangles.
    /// Larger is better.
    pub fn contact_point_score(&self, node: &Rect) -> u64 {
        let mut score = 0u64;
        if node.x == 0 || node.right() == self.bin_width {
            score += node.h as u64;
        }
        if node.y == 0 || node.bottom() == self.bin_height {
            score += node.w as u64;
        }
        for u in &self.used {
            if u.x == node.right() || u.right() == node.x {
                score += common_interval_length(u.y, u.bottom(), node.y, node.bottom()) as u64;
            }
            if u.y == node.bottom() || u.bottom() == node.y {
                score += common_interval_length(u.x, u.right(), node.x, node.right()) as u64;
            }
        }
        score
    }

    /// Best position for the item with its `(score1, score2)` pair, both minimized.
    /// ContactPoint reports the negated contact score as `score1`.
    fn score_rect(
        &self,
        width: u32,
        height: u32,
        method: MaxRectsHeuristic,
    ) -> Option<(Rect, i128, i128)> {
        if width == 0 || height == 0 {
            return None;
        }
        let size = RectSize::new(width, height);
        let mut best: Option<(Rect, i128, i128)> = None;
        for fr in &self.free {
            if !fits(size, fr) {
                continue;
            }
            for oriented in [size, size.rotated()] {
                let (w, h) = (oriented.w, oriented.h);
                if fr.w < w || fr.h < h {
                    continue;
                }
                let node = Rect::new(fr.x, fr.y, w, h);
                let (s1, s2) = self.score_placement(fr, &node, method);
                if fits_perfectly(oriented, fr) {
                    return Some((node, s1, s2));
                }
                let better = match best {
                    None => true,
                    Some((_, b1, b2)) => s1 < b1 || (s1 == b1 && s2 < b2),
                };
                if better {
                    best = Some((node, s1, s2));
                }
            }
        }
        best
    }

    fn score_placement(&self, fr: &Rect, node: &Rect, method: MaxRectsHeuristic) -> (i128, i128) {
        match method {
            MaxRectsHeuristic::BestShortSideFit => score_best_short_side_fit_pair(node.w, node.h, fr),
            MaxRectsHeuristic::BestLongSideFit => score_best_long_side_fit_pair(node.w, node.h, fr),
            MaxRectsHeuristic::BestAreaFit => score_best_area_fit_pair(node.w, node.h, fr),
            MaxRectsHeuristic::BottomLeft => score_bottom_left(node),
            MaxRectsHeuristic::ContactPoint => (-(self.contact_point_score(node) as i128), 0),
        }
    }

    fn place_rect(&mut self, node: Rect) {
        let mut to_process = self.free.len();
        let mut i = 0;
        while i < to_process {
            let fr = self.free[i];
            if split_free_node(&fr, &node, &mut self.free) {
                self.free.remove(i);
                to_process -= 1;
            } else {
                i += 1;
            }
        }
        self.prune_free_list();
        self.used.push(node);
    }
}

/// `(short side leftover, long side leftover)`.
pub fn score_best_short_side_fit_pair(w: u32, h: u32, free: &Rect) -> (i128, i128) {
    (
        score_best_short_side_fit(w, h, free),
        score_best_long_side_fit(w, h, free),
    )
}

/// `(long side leftover, short side leftover)`.
pub fn score_best_long_side_fit_pair(w: u32, h: u32, free: &Rect) -> (i128, i128) {
    (
        score_best_long_side_fit(w, h, free),
        score_best_short_side_fit(w, h, free),
    )
}

/// `(leftover area, short side leftover)`.
pub fn score_best_area_fit_pair(w: u32, h: u32, free: &Rect) -> (i128, i128) {
    (
        score_best_area_fit(w, h, free),
        score_best_short_side_fit(w, h, free),
    )
}

/// `(top edge, left edge)` of the candidate placement.
pub fn score_bottom_left(node: &Rect) -> (i128, i128) {
    (node.bottom() as i128, node.x as i128)
}

/// Splits `free` around `used`, pushing up to four maximal leftovers into `out`.
/// Returns false when the two rectangles do not overlap.
fn split_free_node(free: &Rect, used: &Rect, out: &mut Vec<Rect>) -> bool {
    if !used.intersects(free) {
        return false;
    }

    // above
    if used.y > free.y {
        out.push(Rect::new(free.x, free.y, free.w, used.y - free.y));
    }
    // below
    if used.bottom() < free.bottom() {
        out.push(Rect::new(
            free.x,
            used.bottom(),
            free.w,
            free.bottom() - used.bottom(),
        ));
    }
    // left
    if used.x > free.x {
        out.push(Rect::new(free.x, free.y, used.x - free.x, free.h));
    }
    // right
    if used.right() < free.right() {
        out.push(Rect::new(
            used.right(),
            free.y,
            free.right() - used.right(),
            free.h,
        ));
    }

    true
}
