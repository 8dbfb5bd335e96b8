//! Infrastructure layer: everything that touches the file system.

pub mod config;

pub use config::{
    load_arrangement, parse_arrangement, AdapterEntry, ArrangementConfig, ConfigError, ModeEntry,
    MonitorEntry, PlacementEntry, ProbeConfig,
};
