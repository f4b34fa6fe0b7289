//! Stream header encoding and parsing

use crate::error::WireError;

/// Encoded header size in bytes
pub const HEADER_LEN: usize = 6;

/// Number of storage slots the server keeps per device
pub const NUM_SLOTS: u8 = 6;

/// Operation requested by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// Device streams its canvas to the server
    Save = 1,
    /// Server streams a stored canvas back to the device
    Load = 2,
}

impl Opcode {
    /// Get the opcode as its wire byte
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse an opcode from its wire byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Opcode::Save),
            2 => Some(Opcode::Load),
            _ => None,
        }
    }
}

/// Stream header: operation, slot, canvas dimensions
///
/// The dimensions are authoritative for the rest of the stream; every row
/// record is framed against `width` and exactly `height` records follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Header {
    pub opcode: Opcode,
    pub slot: u8,
    pub height: u16,
    pub width: u16,
}

impl Header {
    /// Create a header, validating slot and dimensions
    pub fn new(opcode: Opcode, slot: u8, height: u16, width: u16) -> Result<Self, WireError> {
        if slot >= NUM_SLOTS {
            return Err(WireError::InvalidSlot);
        }
        if height == 0 || width == 0 {
            return Err(WireError::InvalidDimensions);
        }

        Ok(Self {
            opcode,
            slot,
            height,
            width,
        })
    }

    /// Encode into a byte buffer
    ///
    /// Returns the number of bytes written (always [`HEADER_LEN`]).
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, WireError> {
        if buf.len() < HEADER_LEN {
            return Err(WireError::BufferTooSmall);
        }

        buf[0] = self.opcode.as_u8();
        buf[1] = self.slot;
        buf[2..4].copy_from_slice(&self.height.to_le_bytes());
        buf[4..6].copy_from_slice(&self.width.to_le_bytes());

        Ok(HEADER_LEN)
    }

    /// Parse a header from its 6 wire bytes
    pub fn parse(buf: &[u8; HEADER_LEN]) -> Result<Self, WireError> {
        let opcode = Opcode::from_u8(buf[0]).ok_or(WireError::InvalidOpcode)?;
        let height = u16::from_le_bytes([buf[2], buf[3]]);
        let width = u16::from_le_bytes([buf[4], buf[5]]);

        Self::new(opcode, buf[1], height, width)
    }
}
