#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rectbin_core::geometry::{Rect, RectSize, disjoint, is_contained_in};

/// Set of rectangles that refuses any insertion overlapping an existing member.
#[derive(Debug, Default)]
pub struct DisjointRectCollection {
    pub rects: Vec<Rect>,
}

impl DisjointRectCollection {
    /// Adds `r` unless it overlaps a member. Degenerate rectangles are accepted and not stored.
    pub fn add(&mut self, r: Rect) -> bool {
        if r.is_empty() {
            return true;
        }
        if !self.disjoint_with_all(&r) {
            return false;
        }
        self.rects.push(r);
        true
    }

    pub fn remove(&mut self, r: &Rect) -> bool {
        match self.rects.iter().position(|x| x == r) {
            Some(i) => {
                self.rects.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn disjoint_with_all(&self, r: &Rect) -> bool {
        self.rects.iter().all(|x| disjoint(x, r))
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }
}

/// True when every pair in `rects` is disjoint.
pub fn pairwise_disjoint(rects: &[Rect]) -> bool {
    let mut c = DisjointRectCollection::default();
    rects.iter().all(|r| c.add(*r))
}

pub fn within_bin(rects: &[Rect], w: u32, h: u32) -> bool {
    let bin = Rect::new(0, 0, w, h);
    rects.iter().all(|r| is_contained_in(r, &bin))
}

pub fn area_sum(rects: &[Rect]) -> u64 {
    rects.iter().map(Rect::area).sum()
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_sizes(rng: &mut StdRng, count: usize, min: u32, max: u32) -> Vec<RectSize> {
    (0..count)
        .map(|_| RectSize::new(rng.gen_range(min..=max), rng.gen_range(min..=max)))
        .collect()
}

/// Placed size matches the requested size in one of the two orientations.
pub fn same_size_any_orientation(placed: &Rect, w: u32, h: u32) -> bool {
    (placed.w == w && placed.h == h) || (placed.w == h && placed.h == w)
}
