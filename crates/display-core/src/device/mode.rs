//! Display modes and the appendable mode list.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Physical dimensions of the visible panel, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

/// One mode supported by a monitor.
///
/// The geometry engine never looks inside a mode; only the resolution and the
/// optional physical size are meaningful to layout code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMode {
    /// Horizontal resolution in pixels.
    pub width: u32,
    /// Vertical resolution in pixels.
    pub height: u32,
    /// Refresh rate in Hz.
    pub refresh_hz: u32,
    /// Colour depth.
    pub bits_per_pixel: u32,
    /// Panel size, when the monitor reports one (EDID).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_size: Option<PhysicalSize>,
}

impl DisplayMode {
    /// Creates a mode without physical size information.
    pub fn new(width: u32, height: u32, refresh_hz: u32, bits_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            refresh_hz,
            bits_per_pixel,
            physical_size: None,
        }
    }

    /// Attaches the panel size reported by the monitor.
    pub fn with_physical_size(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.physical_size = Some(PhysicalSize {
            width_mm,
            height_mm,
        });
        self
    }

    /// Returns `(width, height)` in pixels.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}@{}Hz {}bpp",
            self.width, self.height, self.refresh_hz, self.bits_per_pixel
        )
    }
}

/// Change notification emitted by [`ModeList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    /// A mode was appended at `index`.
    Added { index: usize },
}

type ModeListener = Box<dyn Fn(&ModeEvent) + Send + Sync>;

/// Append-only list of supported modes with explicit change notification.
///
/// Listeners run synchronously inside [`ModeList::push`], after the mode has
/// been stored, so a listener may read the new entry through the index it is
/// handed.
#[derive(Default)]
pub struct ModeList {
    modes: Vec<DisplayMode>,
    listeners: Vec<ModeListener>,
}

impl ModeList {
    /// Creates an empty list with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `mode` and notifies every listener.
    pub fn push(&mut self, mode: DisplayMode) {
        self.modes.push(mode);
        let event = ModeEvent::Added {
            index: self.modes.len() - 1,
        };
        for listener in &self.listeners {
            listener(&event);
        }
    }

    /// Registers a listener called on every subsequent [`ModeList::push`].
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&ModeEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DisplayMode> {
        self.modes.get(index)
    }

    pub fn as_slice(&self) -> &[DisplayMode] {
        &self.modes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DisplayMode> {
        self.modes.iter()
    }
}

impl fmt::Debug for ModeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeList")
            .field("modes", &self.modes)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl From<Vec<DisplayMode>> for ModeList {
    fn from(modes: Vec<DisplayMode>) -> Self {
        Self {
            modes,
            listeners: Vec::new(),
        }
    }
}

impl<'a> IntoIterator for &'a ModeList {
    type Item = &'a DisplayMode;
    type IntoIter = std::slice::Iter<'a, DisplayMode>;

    fn into_iter(self) -> Self::IntoIter {
        self.modes.iter()
    }
}

impl Serialize for ModeList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.modes)
    }
}
