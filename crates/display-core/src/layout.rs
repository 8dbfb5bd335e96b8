//! Physical layout registry: which monitor sits where.
//!
//! The layout layer assigns a [`PhysicalPlacement`] to each monitor (from
//! configuration, from EDID sizes, or from the user dragging things around in
//! a UI).  [`PhysicalLayout`] keeps those assignments in insertion order and
//! runs the relationship engine against "every other monitor", so callers do
//! not have to filter the queried monitor out of its own neighbour set.

use serde::Serialize;
use tracing::debug;

use crate::device::{DeviceNode, DeviceTree};
use crate::geometry::{
    distance_to_set, touch_distance_to_set, touches, PhysicalPlacement, Thickness,
};

/// A monitor's device name paired with its placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorPlacement {
    pub device_name: String,
    pub placement: PhysicalPlacement,
}

/// Insertion-ordered set of monitor placements, keyed by device name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhysicalLayout {
    entries: Vec<MonitorPlacement>,
}

impl PhysicalLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a layout from the monitors of `tree`, visited in traversal order.
    ///
    /// `lookup` supplies the placement of each monitor.  Monitors it returns
    /// `None` for are left out.
    pub fn from_tree<F>(tree: &DeviceTree, mut lookup: F) -> Self
    where
        F: FnMut(&DeviceNode) -> Option<PhysicalPlacement>,
    {
        let mut layout = Self::new();
        for monitor in tree.monitors() {
            match lookup(monitor) {
                Some(placement) => layout.place(monitor.device_name(), placement),
                None => debug!(monitor = monitor.device_name(), "monitor has no placement"),
            }
        }
        layout
    }

    /// Places `device_name` at `placement`.  An existing entry keeps its
    /// position in the order and gets the new placement.
    pub fn place(&mut self, device_name: impl Into<String>, placement: PhysicalPlacement) {
        let device_name = device_name.into();
        match self.entries.iter_mut().find(|e| e.device_name == device_name) {
            Some(entry) => entry.placement = placement,
            None => self.entries.push(MonitorPlacement {
                device_name,
                placement,
            }),
        }
    }

    pub fn placement(&self, device_name: &str) -> Option<&PhysicalPlacement> {
        self.entries
            .iter()
            .find(|e| e.device_name == device_name)
            .map(|e| &e.placement)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MonitorPlacement> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Placements of every monitor except `device_name`.
    pub fn others<'a>(
        &'a self,
        device_name: &'a str,
    ) -> impl Iterator<Item = &'a PhysicalPlacement> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.device_name != device_name)
            .map(|e| &e.placement)
    }

    /// Raw edge distance from `device_name` to the nearest of the others.
    /// `None` if the monitor is not placed.
    pub fn distance_to_others(&self, device_name: &str) -> Option<Thickness> {
        let placement = self.placement(device_name)?;
        Some(distance_to_set(placement, self.others(device_name)))
    }

    /// Touch distance from `device_name` to the others.  `None` if the monitor
    /// is not placed.
    pub fn touch_distance_to_others(
        &self,
        device_name: &str,
        treat_zero_as_touching: bool,
    ) -> Option<Thickness> {
        let placement = self.placement(device_name)?;
        Some(touch_distance_to_set(
            placement,
            self.others(device_name),
            treat_zero_as_touching,
        ))
    }

    /// Names of the monitors sharing an edge with `device_name`, in insertion
    /// order.  Empty if the monitor is not placed.
    pub fn touching(&self, device_name: &str) -> Vec<&str> {
        let Some(placement) = self.placement(device_name) else {
            return Vec::new();
        };
        self.entries
            .iter()
            .filter(|e| e.device_name != device_name && touches(placement, &e.placement))
            .map(|e| e.device_name.as_str())
            .collect()
    }
}

impl<'a> IntoIterator for &'a PhysicalLayout {
    type Item = &'a MonitorPlacement;
    type IntoIter = std::slice::Iter<'a, MonitorPlacement>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
