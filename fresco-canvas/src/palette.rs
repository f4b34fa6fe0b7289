//! Fixed 9-color drawing palette
//!
//! Every pixel the device tracks is one of these colors, stored as a small
//! code so a run fits in 4 bits on the wire. The RGB565 values match the
//! display driver's native format.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of colors in the palette
pub const PALETTE_SIZE: usize = 9;

/// One of the nine drawable colors
///
/// Discriminants are the palette codes used by the codec and the wire
/// format; they must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum PaletteColor {
    Red = 0,
    Green = 1,
    Blue = 2,
    Cyan = 3,
    Magenta = 4,
    Yellow = 5,
    White = 6,
    Gray = 7,
    Black = 8,
}

/// Color every canvas pixel resets to
pub const BACKGROUND: PaletteColor = PaletteColor::Black;

impl PaletteColor {
    /// Get the palette code for this color
    pub fn as_code(self) -> u8 {
        self as u8
    }

    /// Look up a color by palette code
    ///
    /// Returns `None` for codes outside the palette; callers decoding
    /// untrusted bytes must not assume every value maps to a color.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PaletteColor::Red),
            1 => Some(PaletteColor::Green),
            2 => Some(PaletteColor::Blue),
            3 => Some(PaletteColor::Cyan),
            4 => Some(PaletteColor::Magenta),
            5 => Some(PaletteColor::Yellow),
            6 => Some(PaletteColor::White),
            7 => Some(PaletteColor::Gray),
            8 => Some(PaletteColor::Black),
            _ => None,
        }
    }

    /// Native RGB565 value for the display driver
    pub fn to_rgb565(self) -> u16 {
        match self {
            PaletteColor::Red => 0xF800,
            PaletteColor::Green => 0x07E0,
            PaletteColor::Blue => 0x001F,
            PaletteColor::Cyan => 0x07FF,
            PaletteColor::Magenta => 0xF81F,
            PaletteColor::Yellow => 0xFFE0,
            PaletteColor::White => 0xFFFF,
            PaletteColor::Gray => 0x520A,
            PaletteColor::Black => 0x0000,
        }
    }

    /// Classify an RGB565 value read back from the display
    ///
    /// Only the nine exact palette values map to a color. Anything else
    /// (e.g. a pixel belonging to UI chrome) is `None`; display adapters
    /// decide how to handle it at their boundary rather than letting an
    /// undefined code into the canvas.
    pub fn from_rgb565(raw: u16) -> Option<Self> {
        match raw {
            0xF800 => Some(PaletteColor::Red),
            0x07E0 => Some(PaletteColor::Green),
            0x001F => Some(PaletteColor::Blue),
            0x07FF => Some(PaletteColor::Cyan),
            0xF81F => Some(PaletteColor::Magenta),
            0xFFE0 => Some(PaletteColor::Yellow),
            0xFFFF => Some(PaletteColor::White),
            0x520A => Some(PaletteColor::Gray),
            0x0000 => Some(PaletteColor::Black),
            _ => None,
        }
    }
}
