//! Network abstraction traits
//!
//! These traits define the interface between the sync engine and the
//! board's network stack. Implementations must bound every blocking call
//! by the timeout they are given (or a fixed, implementation-defined one).

pub mod transport;

pub use transport::{StateFetcher, StreamTransport};
