use serde::{Deserialize, Serialize};

/// Width/height of an item waiting to be packed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct RectSize {
    pub w: u32,
    pub h: u32,
}

impl RectSize {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }

    /// The same size turned by 90°.
    pub fn rotated(&self) -> Self {
        Self::new(self.h, self.w)
    }
}

/// Axis-aligned rectangle. `x,y` is top-left; `w,h` are sizes.
///
/// A rectangle with zero width or height is degenerate and never overlaps anything.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge (`x + w`).
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Exclusive bottom edge (`y + h`).
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    pub fn size(&self) -> RectSize {
        RectSize::new(self.w, self.h)
    }

    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Returns true if `r` is fully inside `self` (inclusive edges).
    pub fn contains(&self, r: &Rect) -> bool {
        is_contained_in(r, self)
    }

    /// True when the interiors overlap. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        !disjoint(self, other)
    }
}

/// True if `item` fits into `free` upright or rotated by 90°.
pub fn fits(item: RectSize, free: &Rect) -> bool {
    (item.w <= free.w && item.h <= free.h) || (item.h <= free.w && item.w <= free.h)
}

/// True if `item` matches `free` exactly in either orientation.
pub fn fits_perfectly(item: RectSize, free: &Rect) -> bool {
    (item.w == free.w && item.h == free.h) || (item.h == free.w && item.w == free.h)
}

/// True if `a` lies entirely within `b`.
pub fn is_contained_in(a: &Rect, b: &Rect) -> bool {
    a.x >= b.x && a.y >= b.y && a.right() <= b.right() && a.bottom() <= b.bottom()
}

/// True if `a` and `b` do not overlap. Degenerate rectangles are disjoint from everything.
pub fn disjoint(a: &Rect, b: &Rect) -> bool {
    if a.is_empty() || b.is_empty() {
        return true;
    }
    a.x >= b.right() || b.x >= a.right() || a.y >= b.bottom() || b.y >= a.bottom()
}

/// Length of the overlap of the half-open intervals `[a1, a2)` and `[b1, b2)`.
pub fn common_interval_length(a1: u32, a2: u32, b1: u32, b2: u32) -> u32 {
    if a2 < b1 || b2 < a1 {
        return 0;
    }
    a2.min(b2) - a1.max(b1)
}
