//! The geometry relationship engine.
//!
//! Every function here is pure: it reads placements and returns a fresh
//! [`Thickness`].  They may be called from any number of threads at once.
//!
//! # Reading an edge distance (for beginners)
//!
//! `edge_distance(a, b)` is not a Euclidean distance.  Each side answers one
//! directional question about the outside bounds of `a` and `b`:
//!
//! | Side     | Question                                   | Formula                  |
//! |----------|--------------------------------------------|--------------------------|
//! | `left`   | How far right of `a` does `b` start?       | `b.left - a.right`       |
//! | `top`    | How far below `a` does `b` start?          | `b.top - a.bottom`       |
//! | `right`  | How far left of `a` does `b` end?          | `a.left - b.right`       |
//! | `bottom` | How far above `a` does `b` end?            | `a.top - b.bottom`       |
//!
//! A positive value means a gap in that direction, zero means the edges are
//! flush, negative means `b` is not on that side of `a` (or overlaps it).
//! Swapping `a` and `b` swaps `left` with `right` and `top` with `bottom`.

use super::placement::PhysicalPlacement;
use super::thickness::Thickness;

/// Signed distance from each outside edge of `a` to the opposite outside edge
/// of `b`.
pub fn edge_distance(a: &PhysicalPlacement, b: &PhysicalPlacement) -> Thickness {
    let a = a.outside_bounds();
    let b = b.outside_bounds();
    Thickness::new(
        b.left() - a.right(),
        b.top() - a.bottom(),
        a.left() - b.right(),
        a.top() - b.bottom(),
    )
}

/// Edge distance restricted to the one axis along which `a` and `b` can touch.
///
/// - Separated on both axes (diagonal): [`Thickness::INFINITY`].
/// - Separated vertically only: `left` and `right` are `+∞`.
/// - Separated horizontally only: `top` and `bottom` are `+∞`.
/// - Overlapping on both axes: the raw [`edge_distance`].  A fully finite,
///   non-positive result therefore means overlap, not touch.
///
/// An axis counts as separated when either of its sides is positive, or, with
/// `treat_zero_as_touching`, exactly zero.  The vertical axis is always tested
/// first, which decides the outcome for corner-adjacent rectangles.
pub fn touch_distance(
    a: &PhysicalPlacement,
    b: &PhysicalPlacement,
    treat_zero_as_touching: bool,
) -> Thickness {
    let d = edge_distance(a, b);
    let separated = |near: f64, far: f64| {
        near > 0.0 || far > 0.0 || (treat_zero_as_touching && (near == 0.0 || far == 0.0))
    };

    if separated(d.top, d.bottom) {
        if separated(d.left, d.right) {
            return Thickness::INFINITY;
        }
        return Thickness::new(f64::INFINITY, d.top, f64::INFINITY, d.bottom);
    }
    if separated(d.left, d.right) {
        return Thickness::new(d.left, f64::INFINITY, d.right, f64::INFINITY);
    }
    d
}

/// Component-wise minimum of [`edge_distance`] from `a` to each of `others`.
///
/// Starts from [`Thickness::MAX`], which is also the result for no others.
pub fn distance_to_set<'a, I>(a: &PhysicalPlacement, others: I) -> Thickness
where
    I: IntoIterator<Item = &'a PhysicalPlacement>,
{
    others
        .into_iter()
        .fold(Thickness::MAX, |min, other| min.min(edge_distance(a, other)))
}

/// Component-wise minimum of [`touch_distance`] from `a` to each of `others`.
///
/// Starts from [`Thickness::INFINITY`], which is also the result for no others.
pub fn touch_distance_to_set<'a, I>(
    a: &PhysicalPlacement,
    others: I,
    treat_zero_as_touching: bool,
) -> Thickness
where
    I: IntoIterator<Item = &'a PhysicalPlacement>,
{
    others.into_iter().fold(Thickness::INFINITY, |min, other| {
        min.min(touch_distance(a, other, treat_zero_as_touching))
    })
}

/// Returns `true` when `a` and `b` share an edge: related along exactly one
/// axis with a gap of exactly zero on that axis.
pub fn touches(a: &PhysicalPlacement, b: &PhysicalPlacement) -> bool {
    let t = touch_distance(a, b, true);
    !t.is_positive_infinity() && t.has_infinite_side() && t.sides().contains(&0.0)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
