//! Settings type definitions
//!
//! These records are owned by the settings collaborator (storage and the
//! configuration page). The engine and renderer only read them and are
//! told when they change.

use heapless::{String, Vec};

use crate::status::bounded;

/// Default HTTP/WebSocket port of the processor
pub const DEFAULT_PORT: u16 = 80;

/// Default reference-level volume offset
pub const DEFAULT_VOLUME_OFFSET: i8 = 7;

/// Maximum host name / address length
pub const MAX_HOST_LEN: usize = 40;

/// Maximum input code length
pub const MAX_INPUT_CODE_LEN: usize = 8;

/// Maximum friendly input name length
pub const MAX_INPUT_NAME_LEN: usize = 32;

/// Maximum entries in the input name map
pub const MAX_INPUT_NAMES: usize = 8;

/// Number of display modes
pub const MODE_COUNT: usize = 4;

/// Number of color themes
pub const THEME_COUNT: usize = 6;

/// Volume font size range
pub const VOLUME_SIZE_MIN: u8 = 1;
pub const VOLUME_SIZE_MAX: u8 = 5;

/// Label font size range
pub const LABEL_SIZE_MIN: u8 = 1;
pub const LABEL_SIZE_MAX: u8 = 3;

/// Number of brightness presets
pub const BRIGHTNESS_LEVELS: u8 = 7;

/// Default brightness preset index
pub const BRIGHTNESS_DEFAULT: u8 = 3;

/// Default time without activity before dimming (ms)
pub const AUTODIM_TIMEOUT_MS: u32 = 3000;

/// Default raw brightness while dimmed
pub const DIM_BRIGHTNESS: u8 = 7;

/// Default time without activity before the panel sleeps (ms)
pub const SLEEP_TIMEOUT_MS: u32 = 60_000;

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Theme {
    #[default]
    White = 0,
    Green,
    Amber,
    Blue,
    Red,
    Cyan,
}

impl Theme {
    /// All themes in index order
    pub const ALL: [Theme; THEME_COUNT] = [
        Theme::White,
        Theme::Green,
        Theme::Amber,
        Theme::Blue,
        Theme::Red,
        Theme::Cyan,
    ];

    /// Theme for a stored index, clamped into range
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.clamp(0, THEME_COUNT as i64 - 1) as usize]
    }

    /// Table index of this theme
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Screen layout preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DisplayMode {
    /// Volume only, centered
    #[default]
    VolumeOnly = 0,
    /// Input label above the volume
    VolumeSource,
    /// Volume above the codec line
    VolumeCodec,
    /// Input, codec, volume, surround mode and listening format
    FullStatus,
}

impl DisplayMode {
    /// All modes in index order
    pub const ALL: [DisplayMode; MODE_COUNT] = [
        DisplayMode::VolumeOnly,
        DisplayMode::VolumeSource,
        DisplayMode::VolumeCodec,
        DisplayMode::FullStatus,
    ];

    /// Mode for a stored index, clamped into range
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.clamp(0, MODE_COUNT as i64 - 1) as usize]
    }

    /// Table index of this mode
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Next mode, wrapping around
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % MODE_COUNT]
    }
}

/// Friendly name for a processor input code
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputName {
    /// Processor input code, e.g. "h1", "usb"
    pub code: String<MAX_INPUT_CODE_LEN>,
    /// Friendly name, e.g. "Apple TV"
    pub name: String<MAX_INPUT_NAME_LEN>,
}

impl InputName {
    /// Create an entry, truncating both strings to capacity
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: bounded(code),
            name: bounded(name),
        }
    }
}

/// Layout settings read by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayoutSettings {
    /// Color theme
    pub theme: Theme,
    /// Selected layout
    pub mode: DisplayMode,
    /// Volume font size per mode (1-5)
    pub vol_sizes: [u8; MODE_COUNT],
    /// Label font size per mode (1-3)
    pub label_sizes: [u8; MODE_COUNT],
    /// Ordered input name map; first match wins
    pub input_names: Vec<InputName, MAX_INPUT_NAMES>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            theme: Theme::White,
            mode: DisplayMode::VolumeOnly,
            // {Volume Only, Vol+Source, Vol+Codec, Full Status}
            vol_sizes: [5, 4, 4, 4],
            label_sizes: [1, 2, 2, 1],
            input_names: Vec::new(),
        }
    }
}

impl LayoutSettings {
    /// Volume font size for the selected mode, clamped into range
    pub fn volume_size(&self) -> u8 {
        self.vol_sizes[self.mode.index()].clamp(VOLUME_SIZE_MIN, VOLUME_SIZE_MAX)
    }

    /// Label font size for the selected mode, clamped into range
    pub fn label_size(&self) -> u8 {
        self.label_sizes[self.mode.index()].clamp(LABEL_SIZE_MIN, LABEL_SIZE_MAX)
    }
}

/// Where the processor lives
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionTarget {
    /// Host name or IP address; empty means not configured
    pub host: String<MAX_HOST_LEN>,
    pub port: u16,
    /// Reference-level offset added to the raw volume
    pub volume_offset: i8,
}

impl Default for ConnectionTarget {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            volume_offset: DEFAULT_VOLUME_OFFSET,
        }
    }
}

impl ConnectionTarget {
    /// Create a target, truncating the host to capacity
    pub fn new(host: &str, port: u16, volume_offset: i8) -> Self {
        Self {
            host: bounded(host),
            port,
            volume_offset,
        }
    }

    /// Check whether a host has been configured
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty()
    }
}

/// Panel brightness and power-saving settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BacklightSettings {
    /// Index into the brightness presets
    pub brightness_level: u8,
    /// Time without activity before dimming (ms); 0 disables dimming
    pub autodim_timeout_ms: u32,
    /// Raw brightness while dimmed
    pub dim_brightness: u8,
    /// Turn the panel off after `sleep_timeout_ms` without activity
    pub sleep_enabled: bool,
    pub sleep_timeout_ms: u32,
}

impl Default for BacklightSettings {
    fn default() -> Self {
        Self {
            brightness_level: BRIGHTNESS_DEFAULT,
            autodim_timeout_ms: AUTODIM_TIMEOUT_MS,
            dim_brightness: DIM_BRIGHTNESS,
            sleep_enabled: false,
            sleep_timeout_ms: SLEEP_TIMEOUT_MS,
        }
    }
}

/// Complete settings record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppSettings {
    pub target: ConnectionTarget,
    pub layout: LayoutSettings,
    pub backlight: BacklightSettings,
}
