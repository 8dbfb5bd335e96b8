//! Four-sided signed gap values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value for each side of a rectangle: left, top, right, bottom.
///
/// Used both as a margin (how far outside bounds extend past bounds) and as an
/// edge distance (signed gap between two rectangles, positive = separated,
/// negative = overlapping, zero = flush).
///
/// Missing fields deserialize as `0.0`, so a margin can be written as
/// `{ left = 5.0 }` in configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thickness {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Thickness {
    pub const ZERO: Thickness = Thickness::uniform(0.0);

    /// "No relationship on any side."  Seed for touch-distance folding.
    pub const INFINITY: Thickness = Thickness::uniform(f64::INFINITY);

    /// Largest finite value on every side.  Seed for raw-distance folding.
    pub const MAX: Thickness = Thickness::uniform(f64::MAX);

    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Returns `true` when all four sides are `+∞`.
    pub fn is_positive_infinity(&self) -> bool {
        self.sides().iter().all(|&side| side == f64::INFINITY)
    }

    /// Returns `true` when at least one side is `+∞`.
    pub fn has_infinite_side(&self) -> bool {
        self.sides().iter().any(|&side| side == f64::INFINITY)
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn min(self, other: Thickness) -> Thickness {
        Thickness::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        )
    }

    /// Sides in `[left, top, right, bottom]` order.
    pub fn sides(&self) -> [f64; 4] {
        [self.left, self.top, self.right, self.bottom]
    }
}

impl fmt::Display for Thickness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(left {}, top {}, right {}, bottom {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_is_component_wise() {
        let a = Thickness::new(1.0, 5.0, -2.0, 8.0);
        let b = Thickness::new(3.0, 4.0, 0.0, f64::INFINITY);
        assert_eq!(a.min(b), Thickness::new(1.0, 4.0, -2.0, 8.0));
    }

    #[test]
    fn test_min_is_idempotent_and_commutative() {
        let x = Thickness::new(10.0, -3.0, f64::INFINITY, 0.0);
        let y = Thickness::new(2.0, 7.0, -1.0, f64::INFINITY);
        assert_eq!(x.min(x), x);
        assert_eq!(x.min(y), y.min(x));
    }

    #[test]
    fn test_infinity_with_anything_finite_yields_the_finite_value() {
        let t = Thickness::new(0.0, f64::INFINITY, -20.0, f64::INFINITY);
        assert_eq!(Thickness::INFINITY.min(t), t);
    }

    #[test]
    fn test_is_positive_infinity_only_for_all_infinite_sides() {
        assert!(Thickness::INFINITY.is_positive_infinity());
        assert!(!Thickness::new(f64::INFINITY, f64::INFINITY, f64::INFINITY, 0.0)
            .is_positive_infinity());
        assert!(!Thickness::MAX.is_positive_infinity());
    }

    #[test]
    fn test_has_infinite_side_detects_single_axis_results() {
        assert!(Thickness::new(f64::INFINITY, 1.0, f64::INFINITY, -1.0).has_infinite_side());
        assert!(!Thickness::ZERO.has_infinite_side());
    }

    #[test]
    fn test_missing_fields_deserialize_as_zero() {
        let t: Thickness = serde_json::from_str(r#"{"left": 5.0}"#).unwrap();
        assert_eq!(t, Thickness::new(5.0, 0.0, 0.0, 0.0));
    }
}
