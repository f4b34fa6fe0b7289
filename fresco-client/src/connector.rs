//! Network connection seam
//!
//! The device's Wi-Fi stack, server address entry, and socket setup are
//! all outside this crate; the sync client only needs something that can
//! hand it a connected byte stream.

use embedded_io::{Read, Write};

/// Source of connections to the storage server
///
/// Implemented over the device's socket layer; tests use in-memory
/// streams. The returned connection is expected to carry its own read and
/// write timeouts, which are the transfer's backstop when the peer stalls
/// (the client never waits unboundedly on a healthy token).
///
/// The connection is closed by dropping it.
pub trait Connector {
    /// A connected, ready byte stream
    type Conn: Read + Write;
    /// Why a connection could not be established
    type Error;

    /// Open a fresh connection to the server
    fn connect(&mut self) -> Result<Self::Conn, Self::Error>;
}
