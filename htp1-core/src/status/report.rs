//! Status report for the configuration surface

use serde::Serialize;

use super::remote::RemoteStatus;

/// Snapshot of the mirrored status as reported to the configuration page
///
/// Field names follow the page's status document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport<'a> {
    /// Stream connectivity to the processor
    pub htp1: bool,
    /// Display volume (raw volume plus offset)
    pub vol: i32,
    /// Processor mute state
    pub muted: bool,
    /// Raw input code
    pub input: &'a str,
    /// Decoded codec name
    pub codec: &'a str,
    /// Processor power state
    pub power: bool,
}

impl<'a> StatusReport<'a> {
    /// Capture a report from a status snapshot and link state
    pub fn capture(status: &'a RemoteStatus, connected: bool) -> Self {
        Self {
            htp1: connected,
            vol: status.display_volume(),
            muted: status.muted,
            input: status.input_label.as_str(),
            codec: status.codec_name.as_str(),
            power: status.power_is_on,
        }
    }
}
