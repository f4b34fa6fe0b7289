//! Sync client configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunables for the sync client
///
/// Server addressing lives with the [`Connector`](crate::Connector)
/// implementation; this only carries behavior the client itself owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClientConfig {
    /// Connection attempts before a transfer is reported as unreachable
    pub connect_attempts: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_attempts: 3,
        }
    }
}
