use super::guillotine::GuillotineBinPack;
use crate::config::{FreeRectChoiceHeuristic, GuillotineSplitHeuristic, LevelChoiceHeuristic};
use crate::geometry::{Rect, RectSize};
use serde::{Deserialize, Serialize};

/// One horizontal segment of the skyline: `[x, x + width)` is covered up to height `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkylineNode {
    pub x: u32,
    pub y: u32,
    pub width: u32,
}

impl SkylineNode {
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }
}

/// Skyline packer with an optional waste map.
///
/// The skyline is kept ordered, contiguous over `[0, bin_width)` and merged. With the
/// waste map enabled, gaps left beneath new placements are handed to an internal
/// `GuillotineBinPack`, which is tried first on every single insert.
#[derive(Debug, Clone)]
pub struct SkylineBinPack {
    bin_width: u32,
    bin_height: u32,
    sky_line: Vec<SkylineNode>,
    used_surface_area: u64,
    waste_map: Option<GuillotineBinPack>,
}

/// Best skyline position: node index, placement and its `(score1, score2)` pair.
type Candidate = (usize, Rect, (u64, u64));

impl SkylineBinPack {
    pub fn new(width: u32, height: u32, use_waste_map: bool) -> Self {
        let mut bin = Self {
            bin_width: 0,
            bin_height: 0,
            sky_line: Vec::new(),
            used_surface_area: 0,
            waste_map: None,
        };
        bin.init(width, height, use_waste_map);
        bin
    }

    /// Resets the skyline to a single node at height 0 spanning the whole bin.
    pub fn init(&mut self, width: u32, height: u32, use_waste_map: bool) {
        self.bin_width = width;
        self.bin_height = height;
        self.used_surface_area = 0;
        self.sky_line.clear();
        if width > 0 {
            self.sky_line.push(SkylineNode {
                x: 0,
                y: 0,
                width,
            });
        }
        self.waste_map = use_waste_map.then(|| GuillotineBinPack::without_free_space(width, height));
    }

    pub fn bin_width(&self) -> u32 {
        self.bin_width
    }

    pub fn bin_height(&self) -> u32 {
        self.bin_height
    }

    pub fn sky_line(&self) -> &[SkylineNode] {
        &self.sky_line
    }

    pub fn waste_map(&self) -> Option<&GuillotineBinPack> {
        self.waste_map.as_ref()
    }

    pub fn used_surface_area(&self) -> u64 {
        self.used_surface_area
    }

    /// Places a single `width x height` item, possibly rotated by 90°.
    ///
    /// The waste map (when enabled) is tried before the skyline. Returns `None` and
    /// leaves the bin untouched when the item fits nowhere.
    pub fn insert(
        &mut self,
        width: u32,
        height: u32,
        method: LevelChoiceHeuristic,
    ) -> Option<Rect> {
        if width == 0 || height == 0 {
            return None;
        }
        if let Some(wm) = self.waste_map.as_mut() {
            if let Some(node) = wm.insert(
                width,
                height,
                true,
                FreeRectChoiceHeuristic::BestShortSideFit,
                GuillotineSplitHeuristic::MaximizeArea,
            ) {
                self.used_surface_area += node.area();
                return Some(node);
            }
        }
        let (idx, node, _) = self.find_position(width, height, method)?;
        self.add_skyline_level(idx, &node);
        self.used_surface_area += node.area();
        Some(node)
    }

    /// Packs as many of `items` as possible onto the skyline, best-scoring item first.
    /// The waste map only collects gaps here; it is not used as a placement target.
    pub fn insert_batch(
        &mut self,
        items: &mut Vec<RectSize>,
        dst: &mut Vec<Rect>,
        method: LevelChoiceHeuristic,
    ) {
        while !items.is_empty() {
            let mut best: Option<(usize, Candidate)> = None;
            for (i, item) in items.iter().enumerate() {
                if item.w == 0 || item.h == 0 {
                    continue;
                }
                if let Some(cand) = self.find_position(item.w, item.h, method) {
                    let better = match &best {
                        None => true,
                        Some((_, (_, _, score))) => cand.2 < *score,
                    };
                    if better {
                        best = Some((i, cand));
                    }
                }
            }
            let Some((item_idx, (node_idx, node, _))) = best else {
                return;
            };
            self.add_skyline_level(node_idx, &node);
            self.used_surface_area += node.area();
            items.remove(item_idx);
            dst.push(node);
        }
    }

    /// `used_surface_area / bin area`.
    pub fn occupancy(&self) -> f64 {
        let bin_area = (self.bin_width as u64) * (self.bin_height as u64);
        if bin_area == 0 {
            return 0.0;
        }
        self.used_surface_area as f64 / bin_area as f64
    }

    /// Coalesces neighbouring nodes of equal height.
    pub fn merge_skylines(&mut self) {
        let mut i = 0;
        while i + 1 < self.sky_line.len() {
            if self.sky_line[i].y == self.sky_line[i + 1].y {
                let w = self.sky_line[i + 1].width;
                self.sky_line[i].width += w;
                self.sky_line.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }

    fn find_position(
        &self,
        width: u32,
        height: u32,
        method: LevelChoiceHeuristic,
    ) -> Option<Candidate> {
        match method {
            LevelChoiceHeuristic::BottomLeft => self.find_bottom_left(width, height),
            LevelChoiceHeuristic::MinWasteFit => self.find_min_waste(width, height),
        }
    }

    /// Scores are `(top edge, width of the starting node)`.
    fn find_bottom_left(&self, width: u32, height: u32) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for i in 0..self.sky_line.len() {
            for (w, h) in [(width, height), (height, width)] {
                if let Some(y) = self.rectangle_fits(i, w, h) {
                    let node = self.sky_line[i];
                    let score = ((y + h) as u64, node.width as u64);
                    if best.is_none_or(|(_, _, s)| score < s) {
                        best = Some((i, Rect::new(node.x, y, w, h), score));
                    }
                }
            }
        }
        best
    }

    /// Scores are `(wasted area under the item, top edge)`.
    fn find_min_waste(&self, width: u32, height: u32) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for i in 0..self.sky_line.len() {
            for (w, h) in [(width, height), (height, width)] {
                if let Some(y) = self.rectangle_fits(i, w, h) {
                    let waste = self.compute_wasted_area(i, w, y);
                    let score = (waste, (y + h) as u64);
                    if best.is_none_or(|(_, _, s)| score < s) {
                        best = Some((i, Rect::new(self.sky_line[i].x, y, w, h), score));
                    }
                }
            }
        }
        best
    }

    /// Height at which a `w x h` item starting at node `idx` would rest, if it fits.
    fn rectangle_fits(&self, idx: usize, w: u32, h: u32) -> Option<u32> {
        let x = self.sky_line[idx].x;
        if x as u64 + w as u64 > self.bin_width as u64 {
            return None;
        }
        let mut width_left = w;
        let mut y = self.sky_line[idx].y;
        let mut i = idx;
        while width_left > 0 {
            let node = self.sky_line.get(i)?;
            y = y.max(node.y);
            if y as u64 + h as u64 > self.bin_height as u64 {
                return None;
            }
            width_left = width_left.saturating_sub(node.width);
            i += 1;
        }
        Some(y)
    }

    fn compute_wasted_area(&self, idx: usize, w: u32, y: u32) -> u64 {
        let rect_left = self.sky_line[idx].x;
        let rect_right = rect_left + w;
        let mut wasted = 0u64;
        for node in &self.sky_line[idx..] {
            if node.x >= rect_right || node.right() <= rect_left {
                break;
            }
            let right = rect_right.min(node.right());
            debug_assert!(y >= node.y);
            wasted += (right - node.x) as u64 * (y - node.y) as u64;
        }
        wasted
    }

    fn add_skyline_level(&mut self, idx: usize, rect: &Rect) {
        self.add_waste_map_area(idx, rect);

        let new_node = SkylineNode {
            x: rect.x,
            y: rect.bottom(),
            width: rect.w,
        };
        debug_assert!(new_node.right() <= self.bin_width);
        debug_assert!(new_node.y <= self.bin_height);
        self.sky_line.insert(idx, new_node);

        let mut i = idx + 1;
        while i < self.sky_line.len() {
            let prev_right = self.sky_line[i - 1].right();
            debug_assert!(self.sky_line[i - 1].x <= self.sky_line[i].x);
            if self.sky_line[i].x >= prev_right {
                break;
            }
            let shrink = prev_right - self.sky_line[i].x;
            if self.sky_line[i].width <= shrink {
                self.sky_line.remove(i);
            } else {
                self.sky_line[i].x += shrink;
                self.sky_line[i].width -= shrink;
                break;
            }
        }
        self.merge_skylines();
    }

    /// Hands the gaps between the spanned nodes and the bottom of `rect` to the waste map.
    fn add_waste_map_area(&mut self, idx: usize, rect: &Rect) {
        let Some(wm) = self.waste_map.as_mut() else {
            return;
        };
        let rect_left = rect.x;
        let rect_right = rect.right();
        for node in &self.sky_line[idx..] {
            if node.x >= rect_right || node.right() <= rect_left {
                break;
            }
            let right = rect_right.min(node.right());
            debug_assert!(rect.y >= node.y);
            wm.add_free_rectangle(Rect::new(node.x, node.y, right - node.x, rect.y - node.y));
        }
    }
}
