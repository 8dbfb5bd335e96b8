//! Adjacency report for a described arrangement.
//!
//! [`run_probe`] is the single use case of the probe:
//!
//! 1. Build the device tree from the arrangement (which implements
//!    [`DeviceEnumerator`](display_core::DeviceEnumerator)).
//! 2. Verify the tree's parent/child links.
//! 3. Build a [`PhysicalLayout`] by looking up each monitor's placement.
//! 4. For every monitor, compute the touch distance and raw distance to all
//!    other monitors, and list the monitors it shares an edge with.
//!
//! Non-finite sides serialize to JSON as `null`.

use std::collections::HashMap;
use std::fmt;

use display_core::{
    enumerate_device_tree, DeviceTree, EnumerationError, PhysicalLayout, PhysicalPlacement,
    Thickness, TreeError,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::infrastructure::{ArrangementConfig, ConfigError};

/// Error type for the probe use case.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("enumeration failed: {0}")]
    Enumeration(#[from] EnumerationError),
    #[error("device tree is inconsistent: {0}")]
    Integrity(#[from] TreeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Relationship of one placed monitor to the rest of the layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorReport {
    pub device_name: String,
    /// Device name of the adapter driving the monitor.
    pub adapter: Option<String>,
    /// Active mode, formatted.
    pub mode: Option<String>,
    pub placement: PhysicalPlacement,
    /// Touch distance to the nearest other monitor on each side.
    pub touch_distance: Thickness,
    /// Raw edge distance to the nearest other monitor on each side.
    pub raw_distance: Thickness,
    /// Monitors sharing an edge with this one, in layout order.
    pub touching: Vec<String>,
}

impl MonitorReport {
    /// `true` when no other monitor is related to this one along either axis.
    pub fn is_isolated(&self) -> bool {
        self.touch_distance.is_positive_infinity()
    }
}

/// The full probe output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    pub treat_zero_as_touching: bool,
    pub monitors: Vec<MonitorReport>,
    /// Monitors present in the tree but missing from the layout.
    pub unplaced: Vec<String>,
}

impl LayoutReport {
    pub fn monitor(&self, device_name: &str) -> Option<&MonitorReport> {
        self.monitors.iter().find(|m| m.device_name == device_name)
    }
}

/// Builds the report for every monitor in `tree`, in traversal order.
pub fn build_report(
    tree: &DeviceTree,
    layout: &PhysicalLayout,
    treat_zero_as_touching: bool,
) -> LayoutReport {
    let mut monitors = Vec::new();
    let mut unplaced = Vec::new();

    for node in tree.monitors() {
        let name = node.device_name();
        let Some(placement) = layout.placement(name) else {
            unplaced.push(name.to_string());
            continue;
        };
        monitors.push(MonitorReport {
            device_name: name.to_string(),
            adapter: node
                .parent()
                .and_then(|p| tree.get(p))
                .map(|adapter| adapter.device_name().to_string()),
            mode: node.current_mode().map(ToString::to_string),
            placement: *placement,
            touch_distance: layout
                .touch_distance_to_others(name, treat_zero_as_touching)
                .unwrap_or(Thickness::INFINITY),
            raw_distance: layout.distance_to_others(name).unwrap_or(Thickness::MAX),
            touching: layout.touching(name).into_iter().map(String::from).collect(),
        });
    }

    LayoutReport {
        treat_zero_as_touching,
        monitors,
        unplaced,
    }
}

/// Runs the whole probe against a loaded arrangement.
///
/// # Errors
///
/// Returns [`ProbeError`] if enumeration fails, the built tree fails its
/// integrity check, or a placement cannot be constructed.
pub fn run_probe(
    config: &ArrangementConfig,
    treat_zero_as_touching: bool,
) -> Result<LayoutReport, ProbeError> {
    let tree = enumerate_device_tree(config)?;
    tree.check_integrity()?;

    let placements: HashMap<String, PhysicalPlacement> = config.placements()?.into_iter().collect();
    let layout = PhysicalLayout::from_tree(&tree, |node| {
        placements.get(node.device_name()).copied()
    });

    let report = build_report(&tree, &layout, treat_zero_as_touching);
    for monitor in report.monitors.iter().filter(|m| m.is_isolated()) {
        warn!(monitor = %monitor.device_name, "monitor is not adjacent to any other monitor");
    }
    info!(
        monitors = report.monitors.len(),
        unplaced = report.unplaced.len(),
        "probe complete"
    );
    Ok(report)
}

// ── Text rendering ────────────────────────────────────────────────────────────

impl fmt::Display for MonitorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.device_name)?;
        if let Some(mode) = &self.mode {
            write!(f, " [{mode}]")?;
        }
        if let Some(adapter) = &self.adapter {
            write!(f, " on {adapter}")?;
        }
        writeln!(f)?;
        writeln!(f, "  touch distance: {}", self.touch_distance)?;
        if self.touching.is_empty() {
            write!(f, "  touching: none")
        } else {
            write!(f, "  touching: {}", self.touching.join(", "))
        }
    }
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} monitor(s), zero gap counts as touching: {}",
            self.monitors.len(),
            if self.treat_zero_as_touching { "yes" } else { "no" }
        )?;
        for monitor in &self.monitors {
            writeln!(f, "{monitor}")?;
        }
        for name in &self.unplaced {
            writeln!(f, "{name}: not placed")?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use display_core::{build_device_tree, DeviceEnumerator, MockDeviceEnumerator, Rect};

    const LEFT: &str = r"\\.\DISPLAY1\Monitor0";
    const RIGHT: &str = r"\\.\DISPLAY2\Monitor0";

    fn desk_tree() -> DeviceTree {
        let records = MockDeviceEnumerator::desktop_two_monitors()
            .enumerate_devices()
            .unwrap();
        build_device_tree(&records)
    }

    /// 27" panel with an 8 mm bezel; 24" panel to its right whose left bezel
    /// sits flush against it.
    fn desk_layout() -> PhysicalLayout {
        let mut layout = PhysicalLayout::new();
        layout.place(
            LEFT,
            PhysicalPlacement::with_margin(
                Rect::new(0.0, 0.0, 597.0, 336.0),
                Thickness::uniform(8.0),
            )
            .unwrap(),
        );
        layout.place(
            RIGHT,
            PhysicalPlacement::with_margin(
                Rect::new(613.0, 20.0, 527.0, 296.0),
                Thickness::new(8.0, 0.0, 0.0, 0.0),
            )
            .unwrap(),
        );
        layout
    }

    #[test]
    fn test_build_report_flush_monitors_touch_with_zero_flag() {
        // Arrange
        let tree = desk_tree();
        let layout = desk_layout();

        // Act
        let report = build_report(&tree, &layout, true);

        // Assert
        let left = report.monitor(LEFT).unwrap();
        assert_eq!(
            left.touch_distance,
            Thickness::new(0.0, f64::INFINITY, -1148.0, f64::INFINITY)
        );
        assert_eq!(left.touching, vec![RIGHT.to_string()]);

        let right = report.monitor(RIGHT).unwrap();
        assert_eq!(
            right.touch_distance,
            Thickness::new(-1148.0, f64::INFINITY, 0.0, f64::INFINITY)
        );
        assert_eq!(right.touching, vec![LEFT.to_string()]);
    }

    #[test]
    fn test_build_report_without_zero_flag_reports_raw_overlap() {
        let tree = desk_tree();
        let layout = desk_layout();

        let report = build_report(&tree, &layout, false);

        let left = report.monitor(LEFT).unwrap();
        assert_eq!(left.touch_distance, left.raw_distance);
        // `touching` always treats a zero gap as shared.
        assert_eq!(left.touching, vec![RIGHT.to_string()]);
    }

    #[test]
    fn test_build_report_records_adapter_and_mode() {
        let report = build_report(&desk_tree(), &desk_layout(), true);
        let left = report.monitor(LEFT).unwrap();

        assert_eq!(left.adapter.as_deref(), Some(r"\\.\DISPLAY1"));
        assert_eq!(left.mode.as_deref(), Some("2560x1440@144Hz 32bpp"));
    }

    #[test]
    fn test_build_report_lists_unplaced_monitors() {
        let tree = desk_tree();
        let mut layout = PhysicalLayout::new();
        layout.place(LEFT, PhysicalPlacement::new(Rect::new(0.0, 0.0, 10.0, 10.0)));

        let report = build_report(&tree, &layout, true);

        assert_eq!(report.monitors.len(), 1);
        assert_eq!(report.unplaced, vec![RIGHT.to_string()]);
    }

    #[test]
    fn test_single_monitor_is_isolated() {
        let tree = desk_tree();
        let mut layout = PhysicalLayout::new();
        layout.place(LEFT, PhysicalPlacement::new(Rect::new(0.0, 0.0, 10.0, 10.0)));

        let report = build_report(&tree, &layout, true);
        let only = &report.monitors[0];

        assert!(only.is_isolated());
        assert_eq!(only.raw_distance, Thickness::MAX);
        assert!(only.touching.is_empty());
    }

    #[test]
    fn test_report_text_lists_every_monitor() {
        let report = build_report(&desk_tree(), &desk_layout(), true);
        let text = report.to_string();

        assert!(text.starts_with("2 monitor(s), zero gap counts as touching: yes"));
        assert!(text.contains(&format!("touching: {RIGHT}")));
        assert!(text.contains(&format!("touching: {LEFT}")));
    }

    #[test]
    fn test_report_json_writes_infinite_sides_as_null() {
        let report = build_report(&desk_tree(), &desk_layout(), true);
        let json = serde_json::to_value(&report).unwrap();

        let touch = &json["monitors"][0]["touch_distance"];
        assert_eq!(touch["left"], serde_json::json!(0.0));
        assert!(touch["top"].is_null());
    }
}
