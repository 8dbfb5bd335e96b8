//! Contract with the platform display enumeration layer.
//!
//! Enumerating real hardware (`EnumDisplayDevices`, XRandR, CoreGraphics) is
//! the job of an outer layer.  That layer hands this crate a list of
//! [`DeviceRecord`]s shaped like the hardware hierarchy, and
//! [`build_device_tree`] turns them into a [`DeviceTree`].
//!
//! # Platform implementations
//!
//! Each platform implements [`DeviceEnumerator`].  A [`MockDeviceEnumerator`]
//! is always compiled so tests on any platform can build realistic trees
//! without a physical display.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::device::{
    DeviceCaps, DeviceNode, DeviceState, DeviceTree, DisplayMode, NodeId, NodeKind,
};

/// Error type for display enumeration.
#[derive(Debug, Error)]
pub enum EnumerationError {
    /// The platform API call to enumerate devices failed.
    ///
    /// The inner string is a human-readable description of the OS error,
    /// e.g. "EnumDisplayDevicesW returned no adapters".
    #[error("platform API error while enumerating display devices: {0}")]
    PlatformError(String),
}

/// One raw device as reported by the platform, with its children nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub kind: NodeKind,
    pub device_name: String,
    #[serde(default)]
    pub device_string: String,
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub device_key: String,
    #[serde(default)]
    pub capabilities: DeviceCaps,
    #[serde(default)]
    pub state: DeviceState,
    #[serde(default)]
    pub modes: Vec<DisplayMode>,
    #[serde(default)]
    pub current_mode: Option<DisplayMode>,
    #[serde(default)]
    pub children: Vec<DeviceRecord>,
}

impl DeviceRecord {
    /// Creates a record with only a kind and a name.
    pub fn new(kind: NodeKind, device_name: impl Into<String>) -> Self {
        Self {
            kind,
            device_name: device_name.into(),
            device_string: String::new(),
            device_id: String::new(),
            device_key: String::new(),
            capabilities: DeviceCaps::default(),
            state: DeviceState::default(),
            modes: Vec::new(),
            current_mode: None,
            children: Vec::new(),
        }
    }

    pub fn adapter(device_name: impl Into<String>, device_string: impl Into<String>) -> Self {
        Self::new(NodeKind::Adapter, device_name).with_device_string(device_string)
    }

    pub fn monitor(device_name: impl Into<String>, device_string: impl Into<String>) -> Self {
        Self::new(NodeKind::Monitor, device_name).with_device_string(device_string)
    }

    pub fn with_device_string(mut self, device_string: impl Into<String>) -> Self {
        self.device_string = device_string.into();
        self
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    pub fn with_device_key(mut self, device_key: impl Into<String>) -> Self {
        self.device_key = device_key.into();
        self
    }

    pub fn with_state(mut self, state: DeviceState) -> Self {
        self.state = state;
        self
    }

    /// Adds a supported mode.
    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.modes.push(mode);
        self
    }

    /// Sets the active mode, also listing it as supported if it is not yet.
    pub fn with_current_mode(mut self, mode: DisplayMode) -> Self {
        if !self.modes.contains(&mode) {
            self.modes.push(mode);
        }
        self.current_mode = Some(mode);
        self
    }

    pub fn with_child(mut self, child: DeviceRecord) -> Self {
        self.children.push(child);
        self
    }

    /// Converts the record's own fields into a detached node.
    pub fn to_node(&self) -> DeviceNode {
        DeviceNode::new(self.kind, self.device_name.clone())
            .with_device_string(self.device_string.clone())
            .with_device_id(self.device_id.clone())
            .with_device_key(self.device_key.clone())
            .with_capabilities(self.capabilities)
            .with_state(self.state)
            .with_modes(self.modes.iter().copied())
            .with_current_mode(self.current_mode)
    }
}

/// Source of raw device records for the current machine.
pub trait DeviceEnumerator: Send + Sync {
    /// Returns the top-level records (usually adapters) in enumeration order.
    ///
    /// # Errors
    ///
    /// Returns [`EnumerationError::PlatformError`] if the OS query fails.
    fn enumerate_devices(&self) -> Result<Vec<DeviceRecord>, EnumerationError>;
}

/// Builds a fresh tree from `records`, preserving their order.
///
/// Records of kind [`NodeKind::Root`] are not copied; their children are
/// attached directly under the tree's synthetic root, so enumerators may
/// report either the root itself or just its adapters.
pub fn build_device_tree(records: &[DeviceRecord]) -> DeviceTree {
    let mut tree = DeviceTree::new();
    for record in records {
        attach_record(&mut tree, NodeId::ROOT, record);
    }
    debug!(
        nodes = tree.node_count(),
        monitors = tree.monitors().count(),
        "built display device tree"
    );
    tree
}

/// Queries `enumerator` and builds the resulting tree.
///
/// # Errors
///
/// Propagates any error from the enumerator.
pub fn enumerate_device_tree(
    enumerator: &dyn DeviceEnumerator,
) -> Result<DeviceTree, EnumerationError> {
    let records = enumerator.enumerate_devices()?;
    Ok(build_device_tree(&records))
}

fn attach_record(tree: &mut DeviceTree, parent: NodeId, record: &DeviceRecord) {
    let id = if record.kind == NodeKind::Root {
        parent
    } else {
        let id = tree.insert(record.to_node());
        tree.add_child(parent, id);
        id
    };
    for child in &record.children {
        attach_record(tree, id, child);
    }
}

// ── Mock implementation (always compiled for tests) ───────────────────────────

/// A mock enumerator that returns a fixed list of records.
///
/// Used in unit tests and on unsupported platforms.  Makes no OS calls.
pub struct MockDeviceEnumerator {
    /// The records returned by every call.
    pub records: Vec<DeviceRecord>,
}

impl MockDeviceEnumerator {
    pub fn new(records: Vec<DeviceRecord>) -> Self {
        Self { records }
    }

    /// Two adapters on a typical desk:
    ///
    /// - `\\.\DISPLAY1` (primary) driving a 27" 2560×1440 panel,
    /// - `\\.\DISPLAY2` driving a 24" 1920×1080 panel,
    /// - `\\.\DISPLAY3`, an adapter output with nothing plugged in.
    pub fn desktop_two_monitors() -> Self {
        let qhd = DisplayMode::new(2560, 1440, 144, 32).with_physical_size(597.0, 336.0);
        let fhd = DisplayMode::new(1920, 1080, 60, 32).with_physical_size(527.0, 296.0);

        let primary = DeviceRecord::adapter(r"\\.\DISPLAY1", "NVIDIA GeForce RTX 3080 Ti")
            .with_device_id(r"PCI\VEN_10DE&DEV_2206&SUBSYS_3A3C1458&REV_A1")
            .with_device_key(r"\Registry\Machine\System\CurrentControlSet\Control\Video\{AC0F00F9-3A6E-11ED-84B1-EBFE3BE9690A}\0000")
            .with_state(DeviceState(
                DeviceState::ATTACHED_TO_DESKTOP | DeviceState::PRIMARY_DEVICE,
            ))
            .with_child(
                DeviceRecord::monitor(r"\\.\DISPLAY1\Monitor0", "Generic PnP Monitor")
                    .with_device_id(r"MONITOR\DEL41A8")
                    .with_state(DeviceState(DeviceState::ACTIVE | DeviceState::ATTACHED))
                    .with_mode(DisplayMode::new(1920, 1080, 60, 32))
                    .with_current_mode(qhd),
            );

        let secondary = DeviceRecord::adapter(r"\\.\DISPLAY2", "NVIDIA GeForce RTX 3080 Ti")
            .with_device_id(r"PCI\VEN_10DE&DEV_2206&SUBSYS_3A3C1458&REV_A1")
            .with_state(DeviceState(DeviceState::ATTACHED_TO_DESKTOP))
            .with_child(
                DeviceRecord::monitor(r"\\.\DISPLAY2\Monitor0", "Generic PnP Monitor")
                    .with_device_id(r"MONITOR\GSM5B7F")
                    .with_state(DeviceState(DeviceState::ACTIVE | DeviceState::ATTACHED))
                    .with_current_mode(fhd),
            );

        let idle = DeviceRecord::adapter(r"\\.\DISPLAY3", "NVIDIA GeForce RTX 3080 Ti")
            .with_device_id(r"PCI\VEN_10DE&DEV_2206&SUBSYS_3A3C1458&REV_A1");

        Self::new(vec![primary, secondary, idle])
    }
}

impl DeviceEnumerator for MockDeviceEnumerator {
    /// Returns the records provided at construction time (never fails).
    fn enumerate_devices(&self) -> Result<Vec<DeviceRecord>, EnumerationError> {
        Ok(self.records.clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    mockall::mock! {
        pub Enumerator {}

        impl DeviceEnumerator for Enumerator {
            fn enumerate_devices(&self) -> Result<Vec<DeviceRecord>, EnumerationError>;
        }
    }

    #[test]
    fn test_build_device_tree_preserves_record_order() {
        // Arrange
        let records = MockDeviceEnumerator::desktop_two_monitors().records;

        // Act
        let tree = build_device_tree(&records);

        // Assert
        let adapters: Vec<&str> = tree
            .all_descendants_of_kind(NodeId::ROOT, NodeKind::Adapter)
            .map(DeviceNode::device_name)
            .collect();
        assert_eq!(adapters, vec![r"\\.\DISPLAY1", r"\\.\DISPLAY2", r"\\.\DISPLAY3"]);
        assert_eq!(tree.monitors().count(), 2);
        assert_eq!(tree.check_integrity(), Ok(()));
    }

    #[test]
    fn test_build_device_tree_copies_modes_and_flags() {
        let tree = build_device_tree(&MockDeviceEnumerator::desktop_two_monitors().records);
        let monitor = tree.find_by_name(r"\\.\DISPLAY1\Monitor0").expect("monitor");

        assert_eq!(monitor.display_modes().len(), 2);
        assert_eq!(monitor.current_mode().map(DisplayMode::resolution), Some((2560, 1440)));
        assert!(monitor.state().is_active());

        let adapter = tree.node(monitor.parent().expect("parent"));
        assert!(adapter.state().is_primary());
    }

    #[test]
    fn test_adapter_without_monitors_is_kept() {
        let tree = build_device_tree(&MockDeviceEnumerator::desktop_two_monitors().records);
        let idle = tree.find_by_name(r"\\.\DISPLAY3").expect("idle adapter");

        assert!(idle.children().is_empty());
        assert!(idle.current_mode().is_none());
    }

    #[test]
    fn test_root_record_children_attach_under_synthetic_root() {
        let records = vec![DeviceRecord::new(NodeKind::Root, "ROOT")
            .with_child(DeviceRecord::adapter("A", "adapter"))];

        let tree = build_device_tree(&records);

        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.children(NodeId::ROOT).len(), 1);
        assert_eq!(tree.node(tree.children(NodeId::ROOT)[0]).device_name(), "A");
    }

    #[test]
    fn test_with_current_mode_does_not_duplicate_listed_mode() {
        let mode = DisplayMode::new(1920, 1080, 60, 32);
        let record = DeviceRecord::monitor("M", "m").with_mode(mode).with_current_mode(mode);
        assert_eq!(record.modes.len(), 1);
    }

    #[test]
    fn test_enumerate_device_tree_uses_enumerator_records() {
        let mut enumerator = MockEnumerator::new();
        enumerator
            .expect_enumerate_devices()
            .times(1)
            .returning(|| Ok(vec![DeviceRecord::adapter("A", "adapter")
                .with_child(DeviceRecord::monitor("A\\M", "monitor"))]));

        let tree = enumerate_device_tree(&enumerator).expect("tree");

        assert_eq!(tree.monitors().count(), 1);
    }

    #[test]
    fn test_enumerate_device_tree_propagates_platform_error() {
        let mut enumerator = MockEnumerator::new();
        enumerator
            .expect_enumerate_devices()
            .returning(|| Err(EnumerationError::PlatformError("no adapters".to_string())));

        let err = enumerate_device_tree(&enumerator).unwrap_err();

        assert!(err.to_string().contains("no adapters"));
    }

    #[test]
    fn test_record_state_reaches_node_unchanged() {
        let state = DeviceState(DeviceState::ACTIVE | DeviceState::REMOVABLE);
        let node = DeviceRecord::monitor("M", "monitor").with_state(state).to_node();

        assert_eq!(node.state(), state);
        assert!(node.state().contains(DeviceState::REMOVABLE));
    }
}
