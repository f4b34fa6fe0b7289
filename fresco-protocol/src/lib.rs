//! Canvas Save/Load Wire Protocol
//!
//! This crate defines the TCP-based format the paint device uses to stream
//! a canvas to and from the storage server, row by row, so a constrained
//! link can recover per row instead of re-sending the whole image.
//!
//! # Stream layout
//!
//! All multi-byte integers are little-endian.
//!
//! ```text
//! ┌────────┬──────┬─────────┬────────┐
//! │ OPCODE │ SLOT │ HEIGHT  │ WIDTH  │   header, 6 bytes
//! │ 1B     │ 1B   │ 2B      │ 2B     │
//! └────────┴──────┴─────────┴────────┘
//! ┌──────┬───────────────────────────┐
//! │ MODE │ BODY                      │   one record per row,
//! │ 1B   │ WIDTH or 2*MODE bytes     │   HEIGHT times
//! └──────┴───────────────────────────┘
//! ```
//!
//! A row record's mode byte selects its encoding: `0` means `WIDTH` raw
//! palette codes follow, any other value `k` means `k` packed segment
//! words follow (see `fresco_canvas::Segment` for the bit layout). The
//! sender picks per row, falling back to raw whenever run-length encoding
//! does not pay off, so no row can ever fail to encode.
//!
//! There is no checksum or trailing length; framing relies on both ends
//! agreeing on the header dimensions.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod error;
pub mod header;
pub mod record;

pub use error::WireError;
pub use header::{Header, Opcode, HEADER_LEN, NUM_SLOTS};
pub use record::{max_wire_segments, RowRecord, MAX_RECORD_LEN, MODE_RAW};
