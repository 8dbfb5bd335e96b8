//! Axis-aligned rectangles in physical units.

use serde::{Deserialize, Serialize};

use super::thickness::Thickness;

/// An axis-aligned rectangle.
///
/// `x` and `y` are the top-left corner.  Edges are exclusive on the right and
/// bottom in the same sense as screen regions, but no containment test here
/// depends on that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from its four edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grows each edge outward by the matching side of `margin`.
    #[must_use]
    pub fn inflate(&self, margin: Thickness) -> Rect {
        Rect::from_edges(
            self.left() - margin.left,
            self.top() - margin.top,
            self.right() + margin.right,
            self.bottom() + margin.bottom,
        )
    }

    /// Returns `true` if `other` lies entirely inside `self` (edges may touch).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}
