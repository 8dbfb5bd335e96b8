//! Physical geometry of monitors and the relationship engine.
//!
//! All values are `f64` in one physical unit (typically millimetres) shared by
//! the whole layout.  The y axis grows downward, like screen coordinates.
//!
//! Nothing here rounds.  Callers that need a snapping tolerance either pass
//! `treat_zero_as_touching` or apply their own epsilon before calling.

pub mod placement;
pub mod rect;
pub mod relation;
pub mod thickness;

pub use placement::{GeometryError, PhysicalPlacement};
pub use rect::Rect;
pub use relation::{distance_to_set, edge_distance, touch_distance, touch_distance_to_set, touches};
pub use thickness::Thickness;
