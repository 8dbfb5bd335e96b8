//! Physical placement of one monitor.

use serde::Serialize;
use thiserror::Error;

use super::rect::Rect;
use super::thickness::Thickness;

/// Errors raised while constructing geometry values.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    /// A margin side was negative, which would put outside bounds inside bounds.
    #[error("margin must not be negative: {0}")]
    NegativeMargin(Thickness),
}

/// Where a monitor sits in the shared physical coordinate space.
///
/// `bounds` is the visible panel.  `outside_bounds` is `bounds` grown by the
/// bezel (or any projection extension) and is the edge used for adjacency.
/// Construction guarantees `outside_bounds` contains `bounds`.
///
/// The layout layer owns placements; the relationship engine only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicalPlacement {
    bounds: Rect,
    outside_bounds: Rect,
}

impl PhysicalPlacement {
    /// A placement without bezel: outside bounds equal bounds.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            outside_bounds: bounds,
        }
    }

    /// A placement whose outside bounds extend `margin` past `bounds`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NegativeMargin`] if any side of `margin` is
    /// negative.
    pub fn with_margin(bounds: Rect, margin: Thickness) -> Result<Self, GeometryError> {
        if margin.sides().iter().any(|&side| side < 0.0) {
            return Err(GeometryError::NegativeMargin(margin));
        }
        Ok(Self {
            bounds,
            outside_bounds: bounds.inflate(margin),
        })
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn outside_bounds(&self) -> &Rect {
        &self.outside_bounds
    }

    /// The margin between bounds and outside bounds.
    pub fn margin(&self) -> Thickness {
        Thickness::new(
            self.bounds.left() - self.outside_bounds.left(),
            self.bounds.top() - self.outside_bounds.top(),
            self.outside_bounds.right() - self.bounds.right(),
            self.outside_bounds.bottom() - self.bounds.bottom(),
        )
    }
}
