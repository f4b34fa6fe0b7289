//! Canvas sync client for the Fresco paint device
//!
//! Drives a whole-canvas save or load against the storage server over any
//! blocking byte-stream connection:
//!
//! - [`BufferedWriter`]: a bounded write buffer that batches the many
//!   small row writes into few socket writes and latches failures into a
//!   sticky flag instead of returning errors mid-stream
//! - [`Connector`]: the seam to the device's network stack
//! - [`SyncClient`]: the save/load state machines themselves
//!
//! Both operations run synchronously to completion and block the control
//! loop while they run; they are user-initiated and infrequent, and the
//! connection timeout plus a [`CancelToken`] checked between rows bound
//! how long the loop can stall.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod cancel;
pub mod client;
pub mod config;
pub mod connector;
pub mod writer;

pub use cancel::CancelToken;
pub use client::{SyncClient, SyncError};
pub use config::ClientConfig;
pub use connector::Connector;
pub use writer::{BufferedWriter, WRITE_BUFFER_CAPACITY};
