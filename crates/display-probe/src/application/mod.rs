//! Application layer: turns a loaded arrangement into an adjacency report.
//!
//! Nothing in here reads files or writes to stdout; `main.rs` owns both ends.
//!
//! # Sub-modules
//!
//! - **`report`** – Builds the device tree and physical layout through
//!   `display-core` and computes each monitor's touch distance to the rest.

pub mod report;

pub use report::{build_report, run_probe, LayoutReport, MonitorReport, ProbeError};
