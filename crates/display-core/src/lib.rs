//! # display-core
//!
//! Shared library modelling the displays attached to a computer and the
//! physical relationships between them.
//!
//! It has zero dependencies on OS APIs, UI frameworks, or configuration files.
//! Platform enumeration and persistence live outside this crate and talk to it
//! through [`enumerate::DeviceEnumerator`] and plain value types.
//!
//! # Architecture overview (for beginners)
//!
//! A desk with several monitors has two separate shapes:
//!
//! - A **logical** shape: graphics adapters own monitors, monitors support
//!   display modes.  That is a tree, and it is what the OS reports.
//! - A **physical** shape: each monitor is a rectangle of glass (plus bezel)
//!   somewhere on the desk.  That is a set of rectangles in one shared
//!   coordinate space, measured in physical units rather than pixels.
//!
//! This crate covers both:
//!
//! - **`device`** – The display device tree.  A synthetic root owns the
//!   adapters, adapters own monitors.  Nodes are stored in an arena and linked
//!   by [`NodeId`] handles, so the parent back-reference never owns anything.
//!
//! - **`geometry`** – Rectangles, margins ([`Thickness`]) and the relationship
//!   engine: signed edge distances and "touch" distances between monitors.
//!
//! - **`layout`** – A small registry that associates monitor names with their
//!   physical placement and answers "how far is this monitor from the rest".
//!
//! - **`enumerate`** – The contract with the platform enumeration layer: the
//!   raw [`DeviceRecord`] type and the code that turns records into a tree.

pub mod device;
pub mod enumerate;
pub mod geometry;
pub mod layout;

// Re-export the most-used types at the crate root so callers can write
// `display_core::DeviceTree` instead of `display_core::device::tree::DeviceTree`.
pub use device::{
    DeviceCaps, DeviceNode, DeviceState, DeviceTree, DisplayMode, ModeEvent, ModeList, NodeId,
    NodeKind, PhysicalSize, TreeError,
};
pub use enumerate::{
    build_device_tree, enumerate_device_tree, DeviceEnumerator, DeviceRecord, EnumerationError,
    MockDeviceEnumerator,
};
pub use geometry::{
    distance_to_set, edge_distance, touch_distance, touch_distance_to_set, touches, GeometryError,
    PhysicalPlacement, Rect, Thickness,
};
pub use layout::{MonitorPlacement, PhysicalLayout};
