//! Classification flags supplied by the enumeration layer.
//!
//! The core treats both flag sets as opaque bits.  [`DeviceState`] names the
//! bits the OS documents so consumers do not have to repeat magic numbers.

use serde::{Deserialize, Serialize};

/// Capability bits reported for a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceCaps(pub u32);

impl DeviceCaps {
    /// Returns the raw bit pattern.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every bit of `mask` is set.
    pub fn contains(self, mask: u32) -> bool {
        self.0 & mask == mask
    }
}

/// State bits reported for a device.
///
/// Bit layout follows the `DISPLAY_DEVICE.StateFlags` convention.  The low bit
/// is overloaded: on an adapter it means "attached to the desktop", on a
/// monitor it means "active".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceState(pub u32);

impl DeviceState {
    pub const ATTACHED_TO_DESKTOP: u32 = 0x0000_0001;
    pub const ACTIVE: u32 = 0x0000_0001;
    pub const MULTI_DRIVER: u32 = 0x0000_0002;
    pub const ATTACHED: u32 = 0x0000_0002;
    pub const PRIMARY_DEVICE: u32 = 0x0000_0004;
    pub const MIRRORING_DRIVER: u32 = 0x0000_0008;
    pub const VGA_COMPATIBLE: u32 = 0x0000_0010;
    pub const REMOVABLE: u32 = 0x0000_0020;
    pub const DISCONNECT: u32 = 0x0200_0000;
    pub const REMOTE: u32 = 0x0400_0000;
    pub const MODES_PRUNED: u32 = 0x0800_0000;

    /// Returns the raw bit pattern.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every bit of `mask` is set.
    pub fn contains(self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    /// Returns `true` for the primary display device.
    pub fn is_primary(self) -> bool {
        self.contains(Self::PRIMARY_DEVICE)
    }

    /// Returns `true` if the device is attached to the desktop (adapter) or
    /// active (monitor).
    pub fn is_active(self) -> bool {
        self.contains(Self::ACTIVE)
    }

    /// Returns `true` for pseudo-devices that mirror another display.
    pub fn is_mirroring(self) -> bool {
        self.contains(Self::MIRRORING_DRIVER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_state_contains_requires_every_mask_bit() {
        let state = DeviceState(DeviceState::ATTACHED_TO_DESKTOP | DeviceState::PRIMARY_DEVICE);
        assert!(state.contains(DeviceState::PRIMARY_DEVICE));
        assert!(!state.contains(DeviceState::PRIMARY_DEVICE | DeviceState::REMOVABLE));
    }

    #[test]
    fn test_device_state_helpers_read_named_bits() {
        let state = DeviceState(DeviceState::ACTIVE | DeviceState::MIRRORING_DRIVER);
        assert!(state.is_active());
        assert!(state.is_mirroring());
        assert!(!state.is_primary());
    }

    #[test]
    fn test_device_caps_default_is_empty() {
        let caps = DeviceCaps::default();
        assert_eq!(caps.bits(), 0);
        assert!(caps.contains(0));
        assert!(!caps.contains(0x1));
    }

    #[test]
    fn test_flags_serialize_as_plain_integers() {
        let json = serde_json::to_string(&DeviceState(0x5)).unwrap();
        assert_eq!(json, "5");
    }
}
