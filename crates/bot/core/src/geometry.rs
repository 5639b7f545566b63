//! Grid positions and rectangular areas.

use std::fmt;

/// Discrete world position expressed in tile coordinates plus a vertical level.
///
/// Two positions only ever compare equal when all three fields match; a
/// position on another plane is never adjacent to, inside of, or near a
/// position on this one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub plane: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32, plane: i32) -> Self {
        Self { x, y, plane }
    }

    /// Position on the ground plane.
    pub const fn ground(x: i32, y: i32) -> Self {
        Self::new(x, y, 0)
    }

    /// Euclidean distance on the x/y grid.
    ///
    /// Returns `f64::INFINITY` for positions on different planes so that
    /// nearest-first orderings never prefer another level.
    pub fn distance_to(self, other: Position) -> f64 {
        if self.plane != other.plane {
            return f64::INFINITY;
        }
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Chebyshev distance, or `None` across planes.
    pub fn chebyshev_to(self, other: Position) -> Option<u32> {
        if self.plane != other.plane {
            return None;
        }
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        Some(dx.max(dy))
    }

    /// True if `other` is this tile or one of its eight neighbours.
    pub fn is_adjacent_or_on(self, other: Position) -> bool {
        matches!(self.chebyshev_to(other), Some(d) if d <= 1)
    }

    /// Returns a copy shifted by `(dx, dy)` on the same plane.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.plane)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.plane)
    }
}

/// Inclusive axis-aligned rectangle on a single plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub plane: i32,
}

impl Area {
    /// Builds an area from two corners, in any order.
    pub fn from_corners(a: Position, b: Position) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
            plane: a.plane,
        }
    }

    /// Builds an area from its south-west corner and a size in tiles.
    pub fn from_origin(origin: Position, width: u32, height: u32) -> Self {
        let w = width.max(1) as i32;
        let h = height.max(1) as i32;
        Self {
            min_x: origin.x,
            min_y: origin.y,
            max_x: origin.x + w - 1,
            max_y: origin.y + h - 1,
            plane: origin.plane,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.plane == self.plane
            && (self.min_x..=self.max_x).contains(&pos.x)
            && (self.min_y..=self.max_y).contains(&pos.y)
    }

    /// Center tile (rounded toward the minimum corner).
    pub fn center(&self) -> Position {
        Position::new(
            self.min_x + (self.max_x - self.min_x) / 2,
            self.min_y + (self.max_y - self.min_y) / 2,
            self.plane,
        )
    }

    /// True when the corners are ordered (min ≤ max on both axes).
    pub fn is_well_formed(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }
}
