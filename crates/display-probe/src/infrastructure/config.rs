//! TOML arrangement files for the probe.
//!
//! An arrangement describes, by hand, what a display enumeration pass would
//! have reported (adapters and the monitors attached to them) plus where
//! each monitor physically sits on the desk.
//!
//! # Example (for beginners)
//!
//! ```toml
//! [probe]
//! log_level = "debug"
//! treat_zero_as_touching = true
//!
//! [[adapters]]
//! device_name = '\\.\DISPLAY1'
//! device_string = "NVIDIA GeForce RTX 3080 Ti"
//! primary = true
//!
//! [[adapters.monitors]]
//! device_name = '\\.\DISPLAY1\Monitor0'
//! mode = { width = 2560, height = 1440, refresh_hz = 144, width_mm = 597.0, height_mm = 336.0 }
//! placement = { x = 0.0, y = 0.0, width = 597.0, height = 336.0, margin = { left = 8.0, right = 8.0 } }
//! ```
//!
//! Single-quoted TOML strings are literal, so Windows device paths need no
//! escaping.  Placements are in millimetres; `margin` is the bezel and may be
//! omitted, or given for only some sides.
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent, so a file without a `[probe]`
//! section is valid.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use display_core::{
    DeviceEnumerator, DeviceRecord, DeviceState, DisplayMode, EnumerationError, GeometryError,
    PhysicalPlacement, Rect, Thickness,
};
use serde::Deserialize;
use thiserror::Error;

/// Error type for loading and validating arrangement files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading arrangement at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse arrangement TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Two monitors share a device name.
    #[error("monitor {0} is listed more than once")]
    DuplicateMonitor(String),

    /// A placement has zero or negative width or height.
    #[error("monitor {monitor} has an empty placement ({width} x {height})")]
    EmptyPlacement {
        monitor: String,
        width: f64,
        height: f64,
    },

    /// A placement's margin is invalid.
    #[error("monitor {monitor} has an invalid placement: {source}")]
    InvalidPlacement {
        monitor: String,
        #[source]
        source: GeometryError,
    },
}

// ── Schema types ──────────────────────────────────────────────────────────────

/// Top-level contents of an arrangement file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ArrangementConfig {
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub adapters: Vec<AdapterEntry>,
}

/// Probe behaviour settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// `tracing` log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether flush (zero-gap) edges count as touching.
    #[serde(default)]
    pub treat_zero_as_touching: bool,
}

/// One display adapter output.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AdapterEntry {
    pub device_name: String,
    #[serde(default)]
    pub device_string: String,
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub device_key: String,
    /// Marks the primary display device.
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub monitors: Vec<MonitorEntry>,
}

/// One monitor attached to an adapter.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MonitorEntry {
    pub device_name: String,
    #[serde(default = "default_monitor_string")]
    pub device_string: String,
    #[serde(default)]
    pub device_id: String,
    pub mode: ModeEntry,
    pub placement: PlacementEntry,
}

/// The monitor's active mode.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModeEntry {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: u32,
    #[serde(default = "default_bits_per_pixel")]
    pub bits_per_pixel: u32,
    #[serde(default)]
    pub width_mm: Option<f64>,
    #[serde(default)]
    pub height_mm: Option<f64>,
}

/// Physical bounds of the visible panel plus its bezel.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlacementEntry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margin: Thickness,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_monitor_string() -> String {
    "Generic PnP Monitor".to_string()
}
fn default_refresh_hz() -> u32 {
    60
}
fn default_bits_per_pixel() -> u32 {
    32
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            treat_zero_as_touching: false,
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl ModeEntry {
    /// Converts to a core [`DisplayMode`].  The physical size is attached only
    /// when both dimensions are given.
    pub fn to_display_mode(&self) -> DisplayMode {
        let mode = DisplayMode::new(self.width, self.height, self.refresh_hz, self.bits_per_pixel);
        match (self.width_mm, self.height_mm) {
            (Some(w), Some(h)) => mode.with_physical_size(w, h),
            _ => mode,
        }
    }
}

impl MonitorEntry {
    /// Builds the monitor's [`PhysicalPlacement`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyPlacement`] for a non-positive size and
    /// [`ConfigError::InvalidPlacement`] for a negative margin.
    pub fn physical_placement(&self) -> Result<PhysicalPlacement, ConfigError> {
        let p = &self.placement;
        if !(p.width > 0.0 && p.height > 0.0) {
            return Err(ConfigError::EmptyPlacement {
                monitor: self.device_name.clone(),
                width: p.width,
                height: p.height,
            });
        }
        PhysicalPlacement::with_margin(Rect::new(p.x, p.y, p.width, p.height), p.margin).map_err(
            |source| ConfigError::InvalidPlacement {
                monitor: self.device_name.clone(),
                source,
            },
        )
    }

    fn to_record(&self) -> DeviceRecord {
        DeviceRecord::monitor(&self.device_name, &self.device_string)
            .with_device_id(&self.device_id)
            .with_state(DeviceState(DeviceState::ACTIVE | DeviceState::ATTACHED))
            .with_current_mode(self.mode.to_display_mode())
    }
}

impl AdapterEntry {
    fn to_record(&self) -> DeviceRecord {
        let mut state = DeviceState::ATTACHED_TO_DESKTOP;
        if self.primary {
            state |= DeviceState::PRIMARY_DEVICE;
        }
        self.monitors.iter().fold(
            DeviceRecord::adapter(&self.device_name, &self.device_string)
                .with_device_id(&self.device_id)
                .with_device_key(&self.device_key)
                .with_state(DeviceState(state)),
            |adapter, monitor| adapter.with_child(monitor.to_record()),
        )
    }
}

impl ArrangementConfig {
    /// Every monitor in file order.
    pub fn monitors(&self) -> impl Iterator<Item = &MonitorEntry> + '_ {
        self.adapters.iter().flat_map(|a| a.monitors.iter())
    }

    /// Adapter-level device records, monitors nested beneath their adapter.
    pub fn device_records(&self) -> Vec<DeviceRecord> {
        self.adapters.iter().map(AdapterEntry::to_record).collect()
    }

    /// Placement of every monitor, keyed by device name, in file order.
    ///
    /// # Errors
    ///
    /// Returns the first placement error encountered.
    pub fn placements(&self) -> Result<Vec<(String, PhysicalPlacement)>, ConfigError> {
        self.monitors()
            .map(|m| Ok((m.device_name.clone(), m.physical_placement()?)))
            .collect()
    }

    /// Checks that monitor names are unique and every placement is usable.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateMonitor`] or a placement error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for monitor in self.monitors() {
            if !seen.insert(monitor.device_name.as_str()) {
                return Err(ConfigError::DuplicateMonitor(monitor.device_name.clone()));
            }
            monitor.physical_placement()?;
        }
        Ok(())
    }
}

/// The arrangement stands in for a platform enumerator.
impl DeviceEnumerator for ArrangementConfig {
    fn enumerate_devices(&self) -> Result<Vec<DeviceRecord>, EnumerationError> {
        Ok(self.device_records())
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses and validates arrangement TOML.
///
/// # Errors
///
/// [`ConfigError::Parse`] for malformed TOML, otherwise any error from
/// [`ArrangementConfig::validate`].
pub fn parse_arrangement(content: &str) -> Result<ArrangementConfig, ConfigError> {
    let config: ArrangementConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Reads and parses the arrangement file at `path`.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read (including when it does not
/// exist), otherwise any error from [`parse_arrangement`].
pub fn load_arrangement(path: &Path) -> Result<ArrangementConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_arrangement(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SIDE_BY_SIDE: &str = r#"
[probe]
log_level = "debug"
treat_zero_as_touching = true

[[adapters]]
device_name = '\\.\DISPLAY1'
device_string = "Test Adapter"
primary = true

[[adapters.monitors]]
device_name = '\\.\DISPLAY1\Monitor0'
mode = { width = 2560, height = 1440, refresh_hz = 144, width_mm = 597.0, height_mm = 336.0 }
placement = { x = 0.0, y = 0.0, width = 597.0, height = 336.0, margin = { left = 8.0, top = 8.0, right = 8.0, bottom = 8.0 } }

[[adapters]]
device_name = '\\.\DISPLAY2'

[[adapters.monitors]]
device_name = '\\.\DISPLAY2\Monitor0'
mode = { width = 1920, height = 1080 }
placement = { x = 613.0, y = 20.0, width = 527.0, height = 296.0, margin = { left = 8.0 } }
"#;

    #[test]
    fn test_parse_arrangement_reads_probe_section() {
        let config = parse_arrangement(SIDE_BY_SIDE).unwrap();
        assert_eq!(config.probe.log_level, "debug");
        assert!(config.probe.treat_zero_as_touching);
    }

    #[test]
    fn test_parse_arrangement_missing_probe_section_uses_defaults() {
        let config = parse_arrangement("").unwrap();
        assert_eq!(config.probe, ProbeConfig::default());
        assert_eq!(config.probe.log_level, "info");
        assert!(!config.probe.treat_zero_as_touching);
        assert!(config.adapters.is_empty());
    }

    #[test]
    fn test_parse_arrangement_malformed_toml_is_parse_error() {
        let result = parse_arrangement("[[adapters]\ndevice_name = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_parse_arrangement_missing_placement_is_parse_error() {
        let toml = r#"
[[adapters]]
device_name = "A"
[[adapters.monitors]]
device_name = "M"
mode = { width = 800, height = 600 }
"#;
        assert!(matches!(parse_arrangement(toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_mode_entry_defaults_refresh_and_depth() {
        let config = parse_arrangement(SIDE_BY_SIDE).unwrap();
        let mode = config.adapters[1].monitors[0].mode.to_display_mode();
        assert_eq!(mode, DisplayMode::new(1920, 1080, 60, 32));
        assert!(mode.physical_size.is_none());
    }

    #[test]
    fn test_mode_entry_with_both_dimensions_carries_physical_size() {
        let config = parse_arrangement(SIDE_BY_SIDE).unwrap();
        let size = config.adapters[0].monitors[0]
            .mode
            .to_display_mode()
            .physical_size
            .unwrap();
        assert_eq!(size.width_mm, 597.0);
        assert_eq!(size.height_mm, 336.0);
    }

    #[test]
    fn test_partial_margin_fills_missing_sides_with_zero() {
        let config = parse_arrangement(SIDE_BY_SIDE).unwrap();
        let margin = config.adapters[1].monitors[0].placement.margin;
        assert_eq!(margin, Thickness::new(8.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_placements_are_in_file_order_with_outside_bounds() {
        let config = parse_arrangement(SIDE_BY_SIDE).unwrap();
        let placements = config.placements().unwrap();

        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].0, r"\\.\DISPLAY1\Monitor0");
        assert_eq!(placements[0].1.outside_bounds().left(), -8.0);
        assert_eq!(placements[1].1.outside_bounds().left(), 605.0);
    }

    #[test]
    fn test_duplicate_monitor_names_are_rejected() {
        let toml = r#"
[[adapters]]
device_name = "A"
[[adapters.monitors]]
device_name = "M"
mode = { width = 800, height = 600 }
placement = { x = 0.0, y = 0.0, width = 10.0, height = 10.0 }
[[adapters.monitors]]
device_name = "M"
mode = { width = 800, height = 600 }
placement = { x = 20.0, y = 0.0, width = 10.0, height = 10.0 }
"#;
        match parse_arrangement(toml) {
            Err(ConfigError::DuplicateMonitor(name)) => assert_eq!(name, "M"),
            other => panic!("expected DuplicateMonitor, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_width_placement_is_rejected() {
        let toml = r#"
[[adapters]]
device_name = "A"
[[adapters.monitors]]
device_name = "M"
mode = { width = 800, height = 600 }
placement = { x = 0.0, y = 0.0, width = 0.0, height = 10.0 }
"#;
        assert!(matches!(
            parse_arrangement(toml),
            Err(ConfigError::EmptyPlacement { .. })
        ));
    }

    #[test]
    fn test_negative_margin_is_rejected() {
        let toml = r#"
[[adapters]]
device_name = "A"
[[adapters.monitors]]
device_name = "M"
mode = { width = 800, height = 600 }
placement = { x = 0.0, y = 0.0, width = 10.0, height = 10.0, margin = { top = -1.0 } }
"#;
        assert!(matches!(
            parse_arrangement(toml),
            Err(ConfigError::InvalidPlacement { .. })
        ));
    }

    #[test]
    fn test_device_records_nest_monitors_under_adapters() {
        let config = parse_arrangement(SIDE_BY_SIDE).unwrap();
        let records = config.device_records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].children.len(), 1);
        assert_eq!(records[0].children[0].device_name, r"\\.\DISPLAY1\Monitor0");
        assert!(records[0].state.is_primary());
        assert!(!records[1].state.is_primary());
    }

    #[test]
    fn test_monitor_record_default_device_string() {
        let config = parse_arrangement(SIDE_BY_SIDE).unwrap();
        let records = config.device_records();
        assert_eq!(records[1].children[0].device_string, "Generic PnP Monitor");
    }

    #[test]
    fn test_arrangement_acts_as_enumerator() {
        let config = parse_arrangement(SIDE_BY_SIDE).unwrap();
        let tree = display_core::enumerate_device_tree(&config).unwrap();

        assert_eq!(tree.monitors().count(), 2);
        assert!(tree.check_integrity().is_ok());
    }

    #[test]
    fn test_load_arrangement_missing_file_is_io_error() {
        let path = Path::new("/definitely/not/here/arrangement.toml");
        match load_arrangement(path) {
            Err(ConfigError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
