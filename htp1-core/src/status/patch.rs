//! Incremental stream decoding
//!
//! The persistent stream carries text frames with one of two prefixes:
//!
//! ```text
//! mso <json>          aggregate dump of the whole processor state
//! msoupdate <json>    array of {"path": ..., "value": ...} patch objects
//! ```
//!
//! Only update frames are decoded. The dump's schema is not authoritative,
//! so it is surfaced as a hint and never parsed.

use alloc::vec::Vec;

use serde_json::Value;

use super::document::DocumentError;
use super::label::{bounded, Label};

/// Prefix of an incremental update frame
pub const UPDATE_PREFIX: &[u8] = b"msoupdate ";

/// Prefix of an aggregate dump frame
pub const DUMP_PREFIX: &[u8] = b"mso ";

/// One field update for [`RemoteStatus`](super::RemoteStatus)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Patch {
    /// `/volume`
    Volume(i32),
    /// `/muted`
    Muted(bool),
    /// `/input`
    InputId(i32),
    /// `/inputLabel`
    InputLabel(Label),
    /// `/status/DECSourceProgram`
    CodecName(Label),
    /// `/status/DECProgramFormat`
    ProgramFormat(Label),
    /// `/status/SurroundMode`
    SurroundMode(Label),
    /// `/status/ENCListeningFormat`
    ListeningFormat(Label),
    /// `/powerIsOn`
    PowerIsOn(bool),
}

impl Patch {
    /// Decode a patch from its path and JSON value
    ///
    /// Returns `None` for unrecognized paths and for values of the wrong
    /// type; both are ignored without error.
    pub fn from_path(path: &str, value: &Value) -> Option<Self> {
        match path {
            "/volume" => as_i32(value).map(Patch::Volume),
            "/muted" => value.as_bool().map(Patch::Muted),
            "/input" => as_i32(value).map(Patch::InputId),
            "/inputLabel" => value.as_str().map(|s| Patch::InputLabel(bounded(s))),
            "/status/DECSourceProgram" => value.as_str().map(|s| Patch::CodecName(bounded(s))),
            "/status/DECProgramFormat" => {
                value.as_str().map(|s| Patch::ProgramFormat(bounded(s)))
            }
            "/status/SurroundMode" => value.as_str().map(|s| Patch::SurroundMode(bounded(s))),
            "/status/ENCListeningFormat" => {
                value.as_str().map(|s| Patch::ListeningFormat(bounded(s)))
            }
            "/powerIsOn" => value.as_bool().map(Patch::PowerIsOn),
            _ => None,
        }
    }

    /// Stream path this patch is addressed to
    pub fn path(&self) -> &'static str {
        match self {
            Patch::Volume(_) => "/volume",
            Patch::Muted(_) => "/muted",
            Patch::InputId(_) => "/input",
            Patch::InputLabel(_) => "/inputLabel",
            Patch::CodecName(_) => "/status/DECSourceProgram",
            Patch::ProgramFormat(_) => "/status/DECProgramFormat",
            Patch::SurroundMode(_) => "/status/SurroundMode",
            Patch::ListeningFormat(_) => "/status/ENCListeningFormat",
            Patch::PowerIsOn(_) => "/powerIsOn",
        }
    }
}

pub(crate) fn as_i32(value: &Value) -> Option<i32> {
    value.as_i64().and_then(|n| i32::try_from(n).ok())
}

/// Kind of a text frame received on the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFrame<'a> {
    /// Incremental update; carries the JSON payload after the prefix
    Update(&'a [u8]),
    /// Aggregate dump; a hint that a full resync is worthwhile
    Dump,
}

/// Classify a stream frame by its prefix
///
/// Payloads without a known prefix are treated as bare update payloads.
pub fn classify_frame(payload: &[u8]) -> StreamFrame<'_> {
    if let Some(rest) = payload.strip_prefix(UPDATE_PREFIX) {
        StreamFrame::Update(rest)
    } else if payload.starts_with(DUMP_PREFIX) {
        StreamFrame::Dump
    } else {
        StreamFrame::Update(payload)
    }
}

/// Decode the JSON payload of an update frame into patches
///
/// Accepts an array of patch objects or a single patch object. Entries
/// with unknown paths or mistyped values are skipped; the order of the
/// remaining patches is preserved.
pub fn parse_update(json: &[u8]) -> Result<Vec<Patch>, DocumentError> {
    let doc: Value = serde_json::from_slice(json)?;

    let mut patches = Vec::new();
    match &doc {
        Value::Array(items) => {
            patches.extend(items.iter().filter_map(patch_from_object));
        }
        Value::Object(_) => {
            patches.extend(patch_from_object(&doc));
        }
        _ => return Err(DocumentError::UnexpectedShape),
    }
    Ok(patches)
}

fn patch_from_object(obj: &Value) -> Option<Patch> {
    let path = obj.get("path")?.as_str()?;
    let value = obj.get("value")?;
    Patch::from_path(path, value)
}
