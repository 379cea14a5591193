//! Remote status record
//!
//! Every field holds the last value learned from either channel. Updates
//! are applied per field (last writer wins) and the dirty flag is
//! edge-triggered: it is set by a change and cleared only by the consumer
//! that observes it.

use super::label::Label;
use super::patch::Patch;

/// Mirrored status of the remote processor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RemoteStatus {
    /// Raw volume reported by the processor (dB)
    pub volume: i32,
    /// Reference-level offset added for display
    pub volume_offset: i8,
    /// Mute state
    pub muted: bool,
    /// Numeric input identifier
    pub input_id: i32,
    /// Raw input code (e.g. "h1")
    pub input_label: Label,
    /// Decoder source program (codec name)
    pub codec_name: Label,
    /// Decoder program format
    pub program_format: Label,
    /// Upmixer / surround mode
    pub surround_mode: Label,
    /// Encoder listening format
    pub listening_format: Label,
    /// Processor power state
    pub power_is_on: bool,
    dirty: bool,
}

impl Default for RemoteStatus {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RemoteStatus {
    /// Create the startup record
    ///
    /// The processor is assumed powered on until told otherwise.
    pub fn new(volume_offset: i8) -> Self {
        Self {
            volume: 0,
            volume_offset,
            muted: false,
            input_id: 0,
            input_label: Label::new(),
            codec_name: Label::new(),
            program_format: Label::new(),
            surround_mode: Label::new(),
            listening_format: Label::new(),
            power_is_on: true,
            dirty: false,
        }
    }

    /// Volume as shown to the user (raw volume plus offset)
    ///
    /// Saturates at the `i32` range for out-of-range device values.
    pub fn display_volume(&self) -> i32 {
        self.volume.saturating_add(i32::from(self.volume_offset))
    }

    /// Check whether a change is pending observation
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Observe and clear the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    /// Mark the record changed without touching any field
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Apply a single patch
    ///
    /// Returns true if the field value actually changed. Does not touch the
    /// dirty flag; use [`apply_batch`](Self::apply_batch) to publish.
    pub fn apply(&mut self, patch: &Patch) -> bool {
        match patch {
            Patch::Volume(v) => assign(&mut self.volume, *v),
            Patch::Muted(m) => assign(&mut self.muted, *m),
            Patch::InputId(id) => assign(&mut self.input_id, *id),
            Patch::InputLabel(s) => assign_label(&mut self.input_label, s),
            Patch::CodecName(s) => assign_label(&mut self.codec_name, s),
            Patch::ProgramFormat(s) => assign_label(&mut self.program_format, s),
            Patch::SurroundMode(s) => assign_label(&mut self.surround_mode, s),
            Patch::ListeningFormat(s) => assign_label(&mut self.listening_format, s),
            Patch::PowerIsOn(p) => assign(&mut self.power_is_on, *p),
        }
    }

    /// Apply a batch of patches as one unit
    ///
    /// The patches are staged on a copy which replaces the record only
    /// after the whole batch is applied, so an observer never sees a frame
    /// half-applied. The dirty flag is raised iff at least one patch
    /// changed a value.
    pub fn apply_batch(&mut self, patches: &[Patch]) -> bool {
        let mut staged = self.clone();
        let mut changed = false;
        for patch in patches {
            changed |= staged.apply(patch);
        }

        if changed {
            *self = staged;
            self.dirty = true;
        }
        changed
    }
}

fn assign<T: PartialEq>(field: &mut T, value: T) -> bool {
    if *field == value {
        return false;
    }
    *field = value;
    true
}

fn assign_label(field: &mut Label, value: &Label) -> bool {
    if field == value {
        return false;
    }
    field.clone_from(value);
    true
}
