//! Remote status mirror
//!
//! The single mutable record of what the processor last told us, and the
//! decoders that turn both update channels into patches against it.

pub mod document;
pub mod label;
pub mod patch;
pub mod remote;
pub mod report;

pub use document::{parse_state_document, DocumentError};
pub use label::{bounded, Label, LABEL_CAPACITY};
pub use patch::{classify_frame, parse_update, Patch, StreamFrame, DUMP_PREFIX, UPDATE_PREFIX};
pub use remote::RemoteStatus;
pub use report::StatusReport;
