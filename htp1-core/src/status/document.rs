//! Full-state document parsing
//!
//! The periodic fetch returns a flat JSON document with a nested `status`
//! object. Only the fields the display mirrors are read:
//!
//! ```text
//! {
//!   "volume": -40,
//!   "muted": false,
//!   "input": "h1",
//!   "status": {
//!     "DECSourceProgram": "Dolby TrueHD",
//!     "DECProgramFormat": "Atmos",
//!     "SurroundMode": "Native",
//!     "ENCListeningFormat": "7.1.4"
//!   }
//! }
//! ```
//!
//! A missing or mistyped field is left out of the result so that it never
//! erases the stored value.

use alloc::vec::Vec;

use serde_json::Value;

use super::label::bounded;
use super::patch::{as_i32, Patch};

/// Errors decoding a JSON payload from either channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DocumentError {
    /// Payload is not valid JSON
    Malformed,
    /// Valid JSON, but not the expected object/array shape
    UnexpectedShape,
}

impl From<serde_json::Error> for DocumentError {
    fn from(_: serde_json::Error) -> Self {
        DocumentError::Malformed
    }
}

/// Parse a full-state document into the patches it implies
///
/// The patches are meant to be applied with
/// [`RemoteStatus::apply_batch`](super::RemoteStatus::apply_batch), which
/// only assigns fields whose value differs.
pub fn parse_state_document(body: &[u8]) -> Result<Vec<Patch>, DocumentError> {
    let doc: Value = serde_json::from_slice(body)?;
    if !doc.is_object() {
        return Err(DocumentError::UnexpectedShape);
    }

    let mut patches = Vec::new();

    if let Some(volume) = doc.get("volume").and_then(as_i32) {
        patches.push(Patch::Volume(volume));
    }
    if let Some(muted) = doc.get("muted").and_then(Value::as_bool) {
        patches.push(Patch::Muted(muted));
    }
    if let Some(input) = doc.get("input").and_then(Value::as_str) {
        patches.push(Patch::InputLabel(bounded(input)));
    }

    if let Some(status) = doc.get("status").filter(|s| s.is_object()) {
        let text = |key: &str| status.get(key).and_then(Value::as_str).map(bounded);

        if let Some(v) = text("DECSourceProgram") {
            patches.push(Patch::CodecName(v));
        }
        if let Some(v) = text("DECProgramFormat") {
            patches.push(Patch::ProgramFormat(v));
        }
        if let Some(v) = text("SurroundMode") {
            patches.push(Patch::SurroundMode(v));
        }
        if let Some(v) = text("ENCListeningFormat") {
            patches.push(Patch::ListeningFormat(v));
        }
    }

    Ok(patches)
}
