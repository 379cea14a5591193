//! Sync engine
//!
//! Keeps [`RemoteStatus`] current from two channels:
//!
//! - **Full-state fetch**: every [`FETCH_INTERVAL_MS`] the complete status
//!   document is requested. This is the canonical resync point and heals
//!   any missed incremental update.
//! - **Incremental stream**: one long-lived connection delivering patch
//!   batches as they happen.
//!
//! [`SyncEngine::poll`] does at most one bounded unit of work per call and
//! is meant to be called once per tick of the driving loop. It is not
//! reentrant.

use alloc::vec;
use alloc::vec::Vec;

use super::link::{LinkEvent, LinkState, ReconnectThrottle};
use crate::config::ConnectionTarget;
use crate::status::{classify_frame, parse_state_document, parse_update, RemoteStatus, StreamFrame};
use crate::traits::{StateFetcher, StreamTransport};

/// Interval between full-state fetches (ms)
pub const FETCH_INTERVAL_MS: u32 = 3000;

/// Timeout for one full-state fetch (ms)
pub const FETCH_TIMEOUT_MS: u32 = 2000;

/// Path of the full-state document
pub const STATE_PATH: &str = "/ircmd";

/// Path of the incremental stream endpoint
pub const STREAM_PATH: &str = "/ws/controller";

/// Receive buffer shared by both channels (bytes)
pub const RX_BUFFER_SIZE: usize = 8192;

/// Unit of work chosen by one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Work {
    Idle,
    Fetch,
    Read,
    Handshake,
    Connect,
}

/// Sync engine owning both channels and the status record
pub struct SyncEngine<F, T> {
    fetcher: F,
    stream: T,
    target: ConnectionTarget,
    status: RemoteStatus,
    link: LinkState,
    throttle: ReconnectThrottle,
    last_fetch_ms: Option<u32>,
    resync_requested: bool,
    rx: Vec<u8>,
}

impl<F: StateFetcher, T: StreamTransport> SyncEngine<F, T> {
    /// Create an engine for `target`
    ///
    /// Nothing is sent until the first [`poll`](Self::poll).
    pub fn new(fetcher: F, stream: T, target: ConnectionTarget) -> Self {
        Self {
            fetcher,
            stream,
            status: RemoteStatus::new(target.volume_offset),
            target,
            link: LinkState::Disconnected,
            throttle: ReconnectThrottle::new(),
            last_fetch_ms: None,
            resync_requested: false,
            rx: vec![0; RX_BUFFER_SIZE],
        }
    }

    /// Perform at most one bounded unit of work
    ///
    /// In priority order: a due full-state fetch, one read from the
    /// stream, a pending handshake, or a throttled connect. Returns true
    /// if the status changed.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        match self.next_work(now_ms) {
            Work::Idle => false,
            Work::Fetch => {
                self.last_fetch_ms = Some(now_ms);
                self.resync_requested = false;
                self.fetch_state()
            }
            Work::Read => self.read_stream(),
            Work::Handshake => {
                self.finish_handshake();
                false
            }
            Work::Connect => {
                self.start_attempt(now_ms);
                false
            }
        }
    }

    fn next_work(&self, now_ms: u32) -> Work {
        if !self.target.is_configured() {
            return Work::Idle;
        }
        if self.fetch_due(now_ms) {
            return Work::Fetch;
        }
        match self.link {
            LinkState::Connected => Work::Read,
            LinkState::Connecting => Work::Handshake,
            LinkState::Disconnected if self.throttle.ready(now_ms) => Work::Connect,
            LinkState::Disconnected => Work::Idle,
        }
    }

    fn fetch_due(&self, now_ms: u32) -> bool {
        if self.resync_requested {
            return true;
        }
        match self.last_fetch_ms {
            None => true,
            Some(last) => now_ms.wrapping_sub(last) >= FETCH_INTERVAL_MS,
        }
    }

    /// Channel A: fetch and merge the full-state document
    fn fetch_state(&mut self) -> bool {
        let len = match self.fetcher.fetch(
            self.target.host.as_str(),
            STATE_PATH,
            FETCH_TIMEOUT_MS,
            &mut self.rx,
        ) {
            Ok(len) => len.min(self.rx.len()),
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("state fetch from {} failed", self.target.host.as_str());
                return false;
            }
        };

        match parse_state_document(&self.rx[..len]) {
            Ok(patches) => self.status.apply_batch(&patches),
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("state document rejected: {:?}", _e);
                false
            }
        }
    }

    /// Channel B: read and apply at most one frame
    fn read_stream(&mut self) -> bool {
        if !self.stream.is_open() {
            #[cfg(feature = "defmt")]
            defmt::info!("stream closed by peer");
            self.drop_link(LinkEvent::Closed);
            return false;
        }

        let len = match self.stream.read_frame(&mut self.rx) {
            Ok(0) => return false,
            Ok(len) => len.min(self.rx.len()),
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("stream read failed");
                self.drop_link(LinkEvent::ReadFailed);
                return false;
            }
        };

        match classify_frame(&self.rx[..len]) {
            StreamFrame::Dump => {
                // Not authoritative; pull the next full fetch forward instead
                self.resync_requested = true;
                false
            }
            StreamFrame::Update(json) => match parse_update(json) {
                Ok(patches) => self.status.apply_batch(&patches),
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("update frame rejected: {:?}", _e);
                    false
                }
            },
        }
    }

    fn start_attempt(&mut self, now_ms: u32) {
        self.throttle.record(now_ms);
        self.stream.close();
        self.link = self.link.transition(LinkEvent::AttemptStarted);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "connecting to {}:{}",
            self.target.host.as_str(),
            self.target.port
        );

        if self
            .stream
            .connect(self.target.host.as_str(), self.target.port)
            .is_err()
        {
            #[cfg(feature = "defmt")]
            defmt::warn!("transport connect failed");
            self.drop_link(LinkEvent::TransportFailed);
        }
    }

    fn finish_handshake(&mut self) {
        match self.stream.handshake(self.target.host.as_str(), STREAM_PATH) {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("stream connected");
                self.link = self.link.transition(LinkEvent::HandshakeComplete);
            }
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("stream handshake failed");
                self.drop_link(LinkEvent::HandshakeFailed);
            }
        }
    }

    fn drop_link(&mut self, event: LinkEvent) {
        self.stream.close();
        self.link = self.link.transition(event);
    }

    /// Update the destination and volume offset
    ///
    /// The new host and port take effect on the next connect attempt. An
    /// offset change is visible immediately and marks the status dirty.
    pub fn set_target(&mut self, host: &str, port: u16, volume_offset: i8) {
        self.target = ConnectionTarget::new(host, port, volume_offset);
        if self.status.volume_offset != volume_offset {
            self.status.volume_offset = volume_offset;
            self.status.mark_dirty();
        }
    }

    /// Check whether the stream is currently connected
    pub fn connectivity(&self) -> bool {
        self.link.is_connected() && self.stream.is_open()
    }

    /// Get the connection state
    pub fn link_state(&self) -> LinkState {
        self.link
    }

    /// Get the current destination
    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    /// Get the status record (read-only)
    pub fn status(&self) -> &RemoteStatus {
        &self.status
    }

    /// Observe and clear the status dirty flag
    pub fn take_dirty(&mut self) -> bool {
        self.status.take_dirty()
    }

    /// Get access to the fetch channel
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Get access to the stream channel
    pub fn stream(&self) -> &T {
        &self.stream
    }
}
