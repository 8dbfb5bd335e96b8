//! The display device tree.
//!
//! # How the tree is shaped
//!
//! ```text
//! ROOT
//!  ├─ Adapter  \\.\DISPLAY1        "NVIDIA GeForce RTX 3080 Ti"
//!  │   ├─ Monitor \\.\DISPLAY1\Monitor0
//!  │   └─ Monitor \\.\DISPLAY1\Monitor1
//!  └─ Adapter  \\.\DISPLAY2        "Intel(R) UHD Graphics 770"
//!      └─ Monitor \\.\DISPLAY2\Monitor0
//! ```
//!
//! One tree is built per enumeration pass and thrown away as a whole when the
//! hardware is enumerated again.  Nothing is patched across snapshots.

pub mod flags;
pub mod mode;
pub mod node;
pub mod tree;

pub use flags::{DeviceCaps, DeviceState};
pub use mode::{DisplayMode, ModeEvent, ModeList, PhysicalSize};
pub use node::{DeviceNode, NodeId, NodeKind};
pub use tree::{Ancestors, Descendants, DeviceTree, NodeSnapshot, TreeError};
