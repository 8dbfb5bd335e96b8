//! A single entry in the display device tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::flags::{DeviceCaps, DeviceState};
use super::mode::{DisplayMode, ModeList};

/// Handle to a node stored in a [`super::DeviceTree`].
///
/// Handles are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The synthetic root of every tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Placeholder carried by nodes that have not been inserted yet.
    pub(crate) const UNASSIGNED: NodeId = NodeId(usize::MAX);

    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closed set of node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Root,
    Adapter,
    Monitor,
    ModeGroup,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Root => "Root",
            NodeKind::Adapter => "Adapter",
            NodeKind::Monitor => "Monitor",
            NodeKind::ModeGroup => "ModeGroup",
        };
        f.write_str(name)
    }
}

/// A display device: the root, an adapter, a monitor, or a mode group.
///
/// Identity fields are fixed at construction through the `with_*` builders.
/// Parent and children are managed exclusively by the owning tree.
#[derive(Debug)]
pub struct DeviceNode {
    pub(crate) id: NodeId,
    kind: NodeKind,
    /// Path-like name, e.g. `ROOT`, `\\.\DISPLAY1`, `\\.\DISPLAY1\Monitor0`.
    device_name: String,
    /// Human readable label, e.g. `NVIDIA GeForce RTX 3080 Ti`.
    device_string: String,
    /// Hardware id, e.g. `PCI\VEN_10DE&DEV_2206&SUBSYS_3A3C1458&REV_A1`.
    device_id: String,
    /// Registry-like path to the device's configuration key.
    device_key: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    display_modes: ModeList,
    current_mode: Option<DisplayMode>,
    capabilities: DeviceCaps,
    state: DeviceState,
}

impl DeviceNode {
    /// Creates a detached node with empty identity strings besides its name.
    pub fn new(kind: NodeKind, device_name: impl Into<String>) -> Self {
        Self {
            id: NodeId::UNASSIGNED,
            kind,
            device_name: device_name.into(),
            device_string: String::new(),
            device_id: String::new(),
            device_key: String::new(),
            parent: None,
            children: Vec::new(),
            display_modes: ModeList::new(),
            current_mode: None,
            capabilities: DeviceCaps::default(),
            state: DeviceState::default(),
        }
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

    pub fn with_capabilities(mut self, capabilities: DeviceCaps) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_state(mut self, state: DeviceState) -> Self {
        self.state = state;
        self
    }

    pub fn with_current_mode(mut self, mode: Option<DisplayMode>) -> Self {
        self.current_mode = mode;
        self
    }

    pub fn with_modes(mut self, modes: impl IntoIterator<Item = DisplayMode>) -> Self {
        for mode in modes {
            self.display_modes.push(mode);
        }
        self
    }

    /// Handle of this node inside its tree.  Only meaningful once inserted.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn device_string(&self) -> &str {
        &self.device_string
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn device_key(&self) -> &str {
        &self.device_key
    }

    /// Non-owning back-reference to the parent, `None` for the root and for
    /// nodes not yet attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion (enumeration) order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn display_modes(&self) -> &ModeList {
        &self.display_modes
    }

    /// Mutable access to the mode list, for appending modes and subscribing.
    pub fn display_modes_mut(&mut self) -> &mut ModeList {
        &mut self.display_modes
    }

    /// The active mode.  `None` means "configured but not active", which is
    /// a valid state.
    pub fn current_mode(&self) -> Option<&DisplayMode> {
        self.current_mode.as_ref()
    }

    pub fn capabilities(&self) -> DeviceCaps {
        self.capabilities
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }
}

impl fmt::Display for DeviceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.device_name, self.device_string)
    }
}
