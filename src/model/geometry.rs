//! Bounding boxes and points in page pixel space.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixel units.
///
/// Coordinates are unsigned, so width and height can never be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    #[serde(rename = "l")]
    pub left: u32,

    /// Top edge
    #[serde(rename = "t")]
    pub top: u32,

    /// Width
    #[serde(rename = "w")]
    pub width: u32,

    /// Height
    #[serde(rename = "h")]
    pub height: u32,
}

impl BBox {
    /// Create a new box.
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    /// The four corners as `(top-left, bottom-left, top-right, bottom-right)`.
    pub fn corners(&self) -> [Point; 4] {
        let (l, t) = (self.left as f64, self.top as f64);
        let (r, b) = (self.right() as f64, self.bottom() as f64);
        [
            Point::new(l, t),
            Point::new(l, b),
            Point::new(r, t),
            Point::new(r, b),
        ]
    }

    /// Vertical whitespace between two boxes, whichever is upper.
    ///
    /// Returns `None` when the boxes touch or overlap vertically.
    pub fn vertical_gap(&self, other: &BBox) -> Option<u32> {
        let (upper, lower) = if other.top < self.top {
            (other, self)
        } else {
            (self, other)
        };
        let gap = lower.top as i64 - upper.top as i64 - upper.height as i64;
        (gap > 0).then_some(gap as u32)
    }

    /// Horizontal distance from the right edge of `self` to the left edge of `next`.
    ///
    /// Negative when the boxes overlap.
    pub fn horizontal_gap(&self, next: &BBox) -> i64 {
        next.left as i64 - self.right() as i64
    }
}

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
