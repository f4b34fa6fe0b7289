//! Cooperative cancellation for in-flight transfers

use core::sync::atomic::{AtomicBool, Ordering};

/// Cancellation handle shared between the UI and a running transfer
///
/// The UI flags the token (e.g. from a cancel button callback); the sync
/// client polls it between rows and abandons the transfer at the next row
/// boundary. Plain load/store, usable from any context.
#[derive(Debug, Default)]
pub struct CancelToken {
    flag: AtomicBool,
}

impl CancelToken {
    /// Create a token in the not-cancelled state
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Re-arm the token for the next transfer
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}
