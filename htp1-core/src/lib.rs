//! Board-agnostic state synchronization for the HTP-1 companion display
//!
//! This crate contains everything that keeps the local mirror of the
//! processor's status current, without depending on a network stack:
//!
//! - Remote status record with edge-triggered dirty flag
//! - Patch decoding for the incremental stream
//! - Full-state document parsing for the periodic fetch
//! - Connection state machine and the sync engine driving both channels
//! - Transport traits implemented by the board support code
//! - Settings types shared with the renderer and the configuration surface

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod status;
pub mod sync;
pub mod traits;

pub use config::{AppSettings, ConnectionTarget, DisplayMode, LayoutSettings, Theme};
pub use status::{Patch, RemoteStatus, StatusReport};
pub use sync::{LinkState, SyncEngine};
pub use traits::{StateFetcher, StreamTransport};
