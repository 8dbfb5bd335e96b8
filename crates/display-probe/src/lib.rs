//! # display-probe
//!
//! Diagnostic consumer of `display-core`.  Reads a described monitor
//! arrangement from a TOML file, builds the device tree and the physical
//! layout through the core, and reports, for every monitor, how far it is
//! from its neighbours and which monitors it shares an edge with.
//!
//! # Architecture
//!
//! ```text
//! arrangement.toml
//!       ↓
//! infrastructure/config   parse + validate, acts as the device enumerator
//!       ↓
//! application/report      tree → layout → per-monitor touch distances
//!       ↓
//! main.rs                 text or JSON on stdout
//! ```

pub mod application;
pub mod infrastructure;
