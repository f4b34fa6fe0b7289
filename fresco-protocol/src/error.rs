//! Wire format errors

/// Errors raised while encoding or decoding the canvas stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireError {
    /// Opcode byte is not a known operation
    InvalidOpcode,
    /// Slot id is outside the server's slot range
    InvalidSlot,
    /// Height or width is zero or outside the supported range
    InvalidDimensions,
    /// Destination buffer too small for encoding
    BufferTooSmall,
    /// Row record mode byte cannot describe a row of the header's width
    InvalidMode,
    /// A palette code outside the fixed palette
    InvalidCode,
    /// A segment word with a zero run length
    ZeroRun,
    /// Decoded row does not cover exactly the header's width
    WidthMismatch,
}
