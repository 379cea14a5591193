//! Settings form handling
//!
//! The configuration page posts a JSON object with any subset of these keys:
//!
//! ```text
//! htp1ip, htp1port, voloff            connection target
//! bright, dimtime, dimbrt,
//! sleepen, sleeptm                    backlight
//! dmode, theme, volSizes,
//! labelSizes, inputs                  layout
//! reset                               restore factory defaults
//! ```
//!
//! Every value is clamped into its valid range. Keys that are missing or
//! carry the wrong JSON type leave the current value alone.

use alloc::vec::Vec;

use serde::Serialize;
use serde_json::{Map, Value};

use super::types::*;
use crate::status::bounded;

/// Errors applying a settings form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Body is not a JSON object
    BadJson,
}

/// Which settings groups an update touched
///
/// This is the change notification handed to the engine and renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingsChange {
    /// Host, port or volume offset changed
    pub target: bool,
    /// Theme, mode, sizes or input names changed
    pub layout: bool,
    /// Brightness, dim or sleep settings changed
    pub backlight: bool,
}

impl SettingsChange {
    /// Compare two settings records group by group
    pub fn between(before: &AppSettings, after: &AppSettings) -> Self {
        Self {
            target: before.target != after.target,
            layout: before.layout != after.layout,
            backlight: before.backlight != after.backlight,
        }
    }

    /// Check whether anything changed
    pub fn any(&self) -> bool {
        self.target || self.layout || self.backlight
    }
}

/// Apply a posted settings form
pub fn apply_json(
    settings: &mut AppSettings,
    body: &[u8],
) -> Result<SettingsChange, SettingsError> {
    let doc: Value = serde_json::from_slice(body).map_err(|_| SettingsError::BadJson)?;
    let form = doc.as_object().ok_or(SettingsError::BadJson)?;

    let before = settings.clone();

    if form.get("reset").and_then(Value::as_bool) == Some(true) {
        *settings = AppSettings::default();
    } else {
        apply_target(&mut settings.target, form);
        apply_backlight(&mut settings.backlight, form);
        apply_layout(&mut settings.layout, form);
    }

    Ok(SettingsChange::between(&before, settings))
}

fn int(form: &Map<alloc::string::String, Value>, key: &str) -> Option<i64> {
    form.get(key).and_then(Value::as_i64)
}

fn apply_target(target: &mut ConnectionTarget, form: &Map<alloc::string::String, Value>) {
    if let Some(host) = form.get("htp1ip").and_then(Value::as_str) {
        target.host = bounded(host.trim());
    }
    if let Some(port) = int(form, "htp1port") {
        target.port = port.clamp(1, i64::from(u16::MAX)) as u16;
    }
    if let Some(offset) = int(form, "voloff") {
        target.volume_offset = offset.clamp(i64::from(i8::MIN), i64::from(i8::MAX)) as i8;
    }
}

fn apply_backlight(backlight: &mut BacklightSettings, form: &Map<alloc::string::String, Value>) {
    if let Some(level) = int(form, "bright") {
        backlight.brightness_level = level.clamp(0, i64::from(BRIGHTNESS_LEVELS) - 1) as u8;
    }
    if let Some(ms) = int(form, "dimtime") {
        backlight.autodim_timeout_ms = ms.clamp(0, i64::from(u32::MAX)) as u32;
    }
    if let Some(raw) = int(form, "dimbrt") {
        backlight.dim_brightness = raw.clamp(1, 255) as u8;
    }
    if let Some(enabled) = form.get("sleepen").and_then(Value::as_bool) {
        backlight.sleep_enabled = enabled;
    }
    if let Some(ms) = int(form, "sleeptm") {
        backlight.sleep_timeout_ms = ms.clamp(0, i64::from(u32::MAX)) as u32;
    }
}

fn apply_layout(layout: &mut LayoutSettings, form: &Map<alloc::string::String, Value>) {
    if let Some(mode) = int(form, "dmode") {
        layout.mode = DisplayMode::from_index(mode);
    }
    if let Some(theme) = int(form, "theme") {
        layout.theme = Theme::from_index(theme);
    }
    if let Some(sizes) = form.get("volSizes").and_then(Value::as_array) {
        apply_sizes(&mut layout.vol_sizes, sizes, VOLUME_SIZE_MIN, VOLUME_SIZE_MAX);
    }
    if let Some(sizes) = form.get("labelSizes").and_then(Value::as_array) {
        apply_sizes(&mut layout.label_sizes, sizes, LABEL_SIZE_MIN, LABEL_SIZE_MAX);
    }
    if let Some(inputs) = form.get("inputs").and_then(Value::as_array) {
        layout.input_names.clear();
        for entry in inputs {
            let code = entry.get("code").and_then(Value::as_str).unwrap_or("");
            let name = entry.get("name").and_then(Value::as_str).unwrap_or("");
            if code.is_empty() {
                continue;
            }
            if layout.input_names.push(InputName::new(code, name)).is_err() {
                break;
            }
        }
    }
}

fn apply_sizes(target: &mut [u8; MODE_COUNT], sizes: &[Value], min: u8, max: u8) {
    for (slot, value) in target.iter_mut().zip(sizes) {
        if let Some(size) = value.as_i64() {
            *slot = size.clamp(i64::from(min), i64::from(max)) as u8;
        }
    }
}

/// Input map entry as shown on the configuration page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputEntry<'a> {
    /// Raw input code reported by the processor
    pub code: &'a str,
    /// Friendly name shown instead
    pub name: &'a str,
}

/// Settings as served to the configuration page
///
/// Uses the same keys the form posts back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsDocument<'a> {
    /// Processor host
    pub htp1ip: &'a str,
    /// Processor port
    pub htp1port: u16,
    /// Volume offset added for display
    pub voloff: i8,
    /// Brightness preset index
    pub bright: u8,
    /// Idle time before dimming (ms)
    pub dimtime: u32,
    /// Dimmed brightness level
    pub dimbrt: u8,
    /// Display mode index
    pub dmode: u8,
    /// Theme index
    pub theme: u8,
    /// Sleep timer enabled
    pub sleepen: bool,
    /// Idle time before sleeping (ms)
    pub sleeptm: u32,
    /// Volume text size per mode
    #[serde(rename = "volSizes")]
    pub vol_sizes: [u8; MODE_COUNT],
    /// Label text size per mode
    #[serde(rename = "labelSizes")]
    pub label_sizes: [u8; MODE_COUNT],
    /// Input name map in order
    pub inputs: Vec<InputEntry<'a>>,
    /// Firmware version
    pub fw: &'static str,
}

impl<'a> From<&'a AppSettings> for SettingsDocument<'a> {
    fn from(s: &'a AppSettings) -> Self {
        Self {
            htp1ip: s.target.host.as_str(),
            htp1port: s.target.port,
            voloff: s.target.volume_offset,
            bright: s.backlight.brightness_level,
            dimtime: s.backlight.autodim_timeout_ms,
            dimbrt: s.backlight.dim_brightness,
            dmode: s.layout.mode as u8,
            theme: s.layout.theme as u8,
            sleepen: s.backlight.sleep_enabled,
            sleeptm: s.backlight.sleep_timeout_ms,
            vol_sizes: s.layout.vol_sizes,
            label_sizes: s.layout.label_sizes,
            inputs: s
                .layout
                .input_names
                .iter()
                .map(|n| InputEntry {
                    code: n.code.as_str(),
                    name: n.name.as_str(),
                })
                .collect(),
            fw: env!("CARGO_PKG_VERSION"),
        }
    }
}
