//! Row record encoding and decoding
//!
//! Each canvas row travels as one record: a mode byte, then either packed
//! segment words or raw palette codes. The mode byte doubles as the
//! segment count, which keeps the happy path at `1 + 2k` bytes while the
//! incompressible worst case is still only one byte over raw.

use fresco_canvas::{PaletteColor, Segment, CANVAS_WIDTH};

use crate::error::WireError;

/// Mode byte announcing a raw (uncompressed) row body
pub const MODE_RAW: u8 = 0;

/// Largest record body this crate will frame, plus the mode byte
///
/// Sized for the device's own canvas width; peers with smaller canvases
/// fit inside it.
pub const MAX_RECORD_LEN: usize = 1 + CANVAS_WIDTH;

/// Most segments worth sending for a row of `width` pixels
///
/// Beyond this point segment words outgrow the raw encoding, so a
/// conforming sender falls back to raw and a receiver can treat a larger
/// count as a framing error.
pub const fn max_wire_segments(width: usize) -> usize {
    (width + 1) / 2
}

/// One row of the canvas stream, borrowing the sender's buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRecord<'a> {
    /// Run-length encoded row covering its full width
    Segments(&'a [Segment]),
    /// Raw palette codes, one byte per pixel
    Raw(&'a [u8]),
}

impl RowRecord<'_> {
    /// Encode this record into `buf`, returning the bytes written
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<usize, WireError> {
        match self {
            RowRecord::Segments(segments) => {
                if segments.is_empty() || segments.len() > u8::MAX as usize {
                    return Err(WireError::InvalidMode);
                }
                let len = 1 + 2 * segments.len();
                if buf.len() < len {
                    return Err(WireError::BufferTooSmall);
                }

                buf[0] = segments.len() as u8;
                for (i, seg) in segments.iter().enumerate() {
                    buf[1 + 2 * i..3 + 2 * i].copy_from_slice(&seg.pack().to_le_bytes());
                }
                Ok(len)
            }
            RowRecord::Raw(codes) => {
                let len = 1 + codes.len();
                if buf.len() < len {
                    return Err(WireError::BufferTooSmall);
                }
                if codes.iter().any(|&c| PaletteColor::from_code(c).is_none()) {
                    return Err(WireError::InvalidCode);
                }

                buf[0] = MODE_RAW;
                buf[1..len].copy_from_slice(codes);
                Ok(len)
            }
        }
    }

    /// Body length implied by a mode byte, for a row of `width` pixels
    ///
    /// Rejects segment counts past [`max_wire_segments`] so a receiver
    /// never reads an unbounded body into its fixed record buffer.
    pub fn body_len(mode: u8, width: usize) -> Result<usize, WireError> {
        if mode == MODE_RAW {
            return Ok(width);
        }

        let count = mode as usize;
        if count > max_wire_segments(width) {
            return Err(WireError::InvalidMode);
        }
        Ok(2 * count)
    }

    /// Decode a raw body into `out`, returning the pixels written
    pub fn decode_raw(body: &[u8], out: &mut [u8]) -> Result<usize, WireError> {
        if out.len() < body.len() {
            return Err(WireError::BufferTooSmall);
        }
        if body.iter().any(|&c| PaletteColor::from_code(c).is_none()) {
            return Err(WireError::InvalidCode);
        }

        out[..body.len()].copy_from_slice(body);
        Ok(body.len())
    }

    /// Decode a segment body into `out`, returning the pixels written
    ///
    /// A segments record must cover exactly `width` pixels; senders fall
    /// back to raw for anything they cannot fully compress.
    pub fn decode_segments(body: &[u8], width: usize, out: &mut [u8]) -> Result<usize, WireError> {
        if body.len() % 2 != 0 {
            return Err(WireError::InvalidMode);
        }
        if out.len() < width {
            return Err(WireError::BufferTooSmall);
        }

        let mut idx = 0;
        for pair in body.chunks_exact(2) {
            let seg = Segment::unpack(u16::from_le_bytes([pair[0], pair[1]]));

            if seg.run == 0 {
                return Err(WireError::ZeroRun);
            }
            if PaletteColor::from_code(seg.code).is_none() {
                return Err(WireError::InvalidCode);
            }
            if idx + seg.run as usize > width {
                return Err(WireError::WidthMismatch);
            }

            out[idx..idx + seg.run as usize].fill(seg.code);
            idx += seg.run as usize;
        }

        if idx != width {
            return Err(WireError::WidthMismatch);
        }
        Ok(idx)
    }
}
