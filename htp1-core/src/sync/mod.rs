//! State synchronization
//!
//! Connection state machine and the engine merging both update channels
//! into the status record.

pub mod engine;
pub mod link;

pub use engine::{SyncEngine, FETCH_INTERVAL_MS, FETCH_TIMEOUT_MS, STATE_PATH, STREAM_PATH};
pub use link::{LinkEvent, LinkState, ReconnectThrottle, RECONNECT_INTERVAL_MS};
