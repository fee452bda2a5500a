use serde::{Deserialize, Serialize};

/// Scalar for surface coordinates and sizes, in CSS pixels.
pub type Px = f32;

/// Two-dimensional point or extent `(x, y)`.
pub type Vec2 = (Px, Px);

/// Identifier of a puzzle tile, equal to its solved slot index.
pub type TileId = u16;

/// Count type used for tile totals and reveal-item totals.
pub type TileCount = u16;

pub const fn square(n: u8) -> TileCount {
    let n = n as TileCount;
    n.saturating_mul(n)
}

/// Axis-aligned rectangle used for target zones and container bounds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: Px,
    pub y: Px,
    pub w: Px,
    pub h: Px,
}

impl Rect {
    pub const fn new(x: Px, y: Px, w: Px, h: Px) -> Self {
        Self { x, y, w, h }
    }

    /// Degenerate extents collapse to a minimal 1x1 zone so callers always
    /// have something hittable.
    pub fn normalized(self) -> Self {
        let w = if self.w.is_finite() { self.w.max(1.0) } else { 1.0 };
        let h = if self.h.is_finite() { self.h.max(1.0) } else { 1.0 };
        let x = if self.x.is_finite() { self.x } else { 0.0 };
        let y = if self.y.is_finite() { self.y } else { 0.0 };
        Self { x, y, w, h }
    }

    /// Strict-interior containment; points on the edge are outside.
    pub fn contains(&self, (px, py): Vec2) -> bool {
        px > self.x && px < self.x + self.w && py > self.y && py < self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}
