//! Virtual canvas: the full drawing surface as compressed rows
//!
//! The drawable surface is 310x310 pixels. Held raw at one code per pixel
//! that is ~94 KB, far past the device budget; as one bounded compressed
//! record per row it is a few KB with fully predictable worst-case size.

use crate::palette::BACKGROUND;
use crate::row::CompressedRow;

/// Drawable width in pixels
pub const CANVAS_WIDTH: usize = 310;

/// Drawable height in pixels
pub const CANVAS_HEIGHT: usize = 310;

/// Segment budget of an in-canvas row record
///
/// Seven segments track typical stroke patterns; busier rows degrade to a
/// compressed prefix and lean on the live display for their tail.
pub const MAX_ROW_SEGMENTS: usize = 7;

/// Row record type stored in the canvas
pub type CanvasRow = CompressedRow<MAX_ROW_SEGMENTS>;

/// The whole drawable surface, one compressed record per row
///
/// Allocated once and mutated in place: the stroke painter patches rows as
/// the user draws, the sync client rebuilds them on load and reads them on
/// save. Row records never cover more than the canvas width and may cover
/// less (see [`CompressedRow`]).
#[derive(Debug, Clone)]
pub struct VirtualCanvas {
    rows: [CanvasRow; CANVAS_HEIGHT],
}

impl Default for VirtualCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualCanvas {
    /// Create a canvas with every row set to the background color
    pub fn new() -> Self {
        Self {
            rows: core::array::from_fn(|_| {
                CanvasRow::filled(BACKGROUND.as_code(), CANVAS_WIDTH)
            }),
        }
    }

    /// Reset every row to a single full-width background segment
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            *row = CanvasRow::filled(BACKGROUND.as_code(), CANVAS_WIDTH);
        }
    }

    /// Compressed record for one row
    pub fn row(&self, index: usize) -> &CanvasRow {
        &self.rows[index]
    }

    /// Replace a row record
    pub fn set_row(&mut self, index: usize, row: CanvasRow) {
        self.rows[index] = row;
    }

    /// Recompress a row from raw codes, establishing a fresh baseline
    ///
    /// Used by the load path after a row arrives from the server. Rows too
    /// busy for the in-canvas segment budget end up as compressed prefixes,
    /// consistent with how the painter degrades them.
    pub fn load_row(&mut self, index: usize, codes: &[u8]) {
        self.rows[index] = CanvasRow::compress(codes);
    }
}
