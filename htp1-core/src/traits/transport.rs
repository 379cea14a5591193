//! Transport traits for the two update channels

/// One-shot request for the full-state document
///
/// Implemented over an HTTP client.
pub trait StateFetcher {
    /// Error type for fetch operations
    type Error;

    /// Fetch `http://{host}{path}` and copy the response body into `body`
    ///
    /// Must give up after `timeout_ms`. A non-success HTTP status is an
    /// error. Returns the number of body bytes written; a body larger than
    /// `body` may be truncated.
    fn fetch(
        &mut self,
        host: &str,
        path: &str,
        timeout_ms: u32,
        body: &mut [u8],
    ) -> Result<usize, Self::Error>;
}

/// Persistent text-frame stream
///
/// Implemented over a TCP socket carrying a WebSocket session. The engine
/// calls `connect` and `handshake` on separate polls and never overlaps
/// two attempts.
pub trait StreamTransport {
    /// Error type for stream operations
    type Error;

    /// Open the transport connection to `host:port`
    fn connect(&mut self, host: &str, port: u16) -> Result<(), Self::Error>;

    /// Perform the protocol handshake for `path` on the open connection
    fn handshake(&mut self, host: &str, path: &str) -> Result<(), Self::Error>;

    /// Read one text frame into `buf` without waiting for data
    ///
    /// Returns `Ok(0)` when no frame is pending.
    fn read_frame(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Check whether the underlying connection is still open
    fn is_open(&self) -> bool;

    /// Drop the connection, if any
    fn close(&mut self);
}
