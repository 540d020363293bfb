//! Integer grid geometry
//!
//! All inventory coordinates are whole cells. Rectangles are half-open:
//! `min` is inclusive and `max` is exclusive, so a 2×2 item anchored at
//! `(0, 0)` has `max == (2, 2)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A cell coordinate or item anchor on an inventory grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    /// The grid origin
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new point
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Point offset by a size (the exclusive far corner of an extent)
    #[inline]
    pub fn offset(self, size: GridSize) -> Self {
        Self::new(self.x + size.width as i32, self.y + size.height as i32)
    }
}

impl Add for GridPoint {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for GridPoint {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for GridPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Extent of an item or container in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    /// Create a new size
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of cells covered
    #[inline]
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True if either dimension is zero
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True if this extent is no larger than `other` on both axes
    #[inline]
    pub fn fits_within(&self, other: GridSize) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

impl From<(u32, u32)> for GridSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridRect {
    /// Inclusive top-left corner
    pub min: GridPoint,
    /// Exclusive bottom-right corner
    pub max: GridPoint,
}

impl GridRect {
    /// Create a rectangle anchored at `min` with the given size
    #[inline]
    pub fn new(min: GridPoint, size: GridSize) -> Self {
        Self {
            min,
            max: min.offset(size),
        }
    }

    /// Rectangle anchored at the origin
    #[inline]
    pub fn from_size(size: GridSize) -> Self {
        Self::new(GridPoint::ZERO, size)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        (self.max.x - self.min.x).max(0) as u32
    }

    #[inline]
    pub fn height(&self) -> u32 {
        (self.max.y - self.min.y).max(0) as u32
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        GridSize::new(self.width(), self.height())
    }

    /// True if the rectangle covers no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// Check if a cell lies inside the rectangle
    #[inline]
    pub fn contains_point(&self, point: GridPoint) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    /// Check if `other` lies inside this rectangle, allowing `padding` cells of slack on every edge
    ///
    /// With integer coordinates any padding below one cell behaves as an inclusive bounds check.
    pub fn contains_padded(&self, other: &GridRect, padding: f32) -> bool {
        other.min.x as f32 >= self.min.x as f32 - padding
            && other.min.y as f32 >= self.min.y as f32 - padding
            && other.max.x as f32 <= self.max.x as f32 + padding
            && other.max.y as f32 <= self.max.y as f32 + padding
    }

    /// Check if two rectangles share at least one cell
    #[inline]
    pub fn intersects(&self, other: &GridRect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Overlapping region of two rectangles
    pub fn intersection(&self, other: &GridRect) -> Option<GridRect> {
        if !self.intersects(other) {
            return None;
        }
        Some(GridRect {
            min: GridPoint::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: GridPoint::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        })
    }

    /// Iterate every cell, x outer and y inner
    pub fn cells(&self) -> impl Iterator<Item = GridPoint> {
        let (min, max) = (self.min, self.max);
        (min.x..max.x).flat_map(move |x| (min.y..max.y).map(move |y| GridPoint::new(x, y)))
    }

    /// Anchor that centers an extent of `size` inside this rectangle
    ///
    /// Rounds toward the top-left; an extent larger than the rectangle gets a
    /// negative offset.
    pub fn center_anchor(&self, size: GridSize) -> GridPoint {
        let dx = (self.width() as i32 - size.width as i32).div_euclid(2);
        let dy = (self.height() as i32 - size.height as i32).div_euclid(2);
        GridPoint::new(self.min.x + dx, self.min.y + dy)
    }
}

impl fmt::Display for GridRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {})", self.min, self.max)
    }
}
