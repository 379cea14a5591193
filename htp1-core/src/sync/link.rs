//! Stream connection state machine
//!
//! ```text
//!              AttemptStarted            HandshakeComplete
//! Disconnected ──────────────► Connecting ─────────────────► Connected
//!      ▲                           │                            │
//!      └── TransportFailed ────────┤                            │
//!      └── HandshakeFailed ────────┘                            │
//!      └── ReadFailed / Closed ─────────────────────────────────┘
//! ```
//!
//! `Connecting` is the single pending state: no new attempt may start
//! while it is held.

/// Minimum time between connect attempts (ms)
pub const RECONNECT_INTERVAL_MS: u32 = 5000;

/// Connection states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// No connection; a throttled attempt may start
    #[default]
    Disconnected,
    /// Transport open, handshake pending
    Connecting,
    /// Handshake done, frames flowing
    Connected,
}

/// Events driving the connection state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// A connect attempt began
    AttemptStarted,
    /// Transport connect failed
    TransportFailed,
    /// Protocol handshake succeeded
    HandshakeComplete,
    /// Protocol handshake failed
    HandshakeFailed,
    /// Read from an established connection failed
    ReadFailed,
    /// Peer closed the connection
    Closed,
}

impl LinkState {
    /// Check whether frames can be read
    pub fn is_connected(&self) -> bool {
        matches!(self, LinkState::Connected)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: LinkEvent) -> Self {
        use LinkEvent::*;
        use LinkState::*;

        match (self, event) {
            (Disconnected, AttemptStarted) => Connecting,

            (Connecting, TransportFailed) => Disconnected,
            (Connecting, HandshakeComplete) => Connected,
            (Connecting, HandshakeFailed) => Disconnected,
            (Connecting, Closed) => Disconnected,

            (Connected, ReadFailed) => Disconnected,
            (Connected, Closed) => Disconnected,

            // Default: stay in current state
            _ => self,
        }
    }
}

/// Attempt throttle for reconnects
///
/// Remembers when the last attempt started; time is a wrapping
/// millisecond counter.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReconnectThrottle {
    last_attempt_ms: Option<u32>,
}

impl ReconnectThrottle {
    /// Create a throttle that allows an immediate first attempt
    pub const fn new() -> Self {
        Self {
            last_attempt_ms: None,
        }
    }

    /// Check whether an attempt may start at `now_ms`
    pub fn ready(&self, now_ms: u32) -> bool {
        match self.last_attempt_ms {
            None => true,
            Some(last) => now_ms.wrapping_sub(last) >= RECONNECT_INTERVAL_MS,
        }
    }

    /// Record that an attempt started at `now_ms`
    pub fn record(&mut self, now_ms: u32) {
        self.last_attempt_ms = Some(now_ms);
    }
}
