//! Incremental stroke application
//!
//! A pen stroke only ever touches the rows inside its bounding box, so the
//! painter recomputes exactly those rows: decompress the known prefix into
//! a scratch buffer, patch the stamped columns, recompress in place. Cost
//! is proportional to the stroke area, not the canvas size.

use crate::canvas::{CanvasRow, VirtualCanvas, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::palette::PaletteColor;
use crate::stamp::{Stamp, MAX_PEN_RADIUS};
use crate::surface::PixelSurface;

/// One pen input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stroke {
    /// Center column
    pub x: u16,
    /// Center row
    pub y: u16,
    /// Pen radius, clamped to [`MAX_PEN_RADIUS`]
    pub radius: u16,
    /// Pen color
    pub color: PaletteColor,
}

/// Applies strokes to the virtual canvas
///
/// Owns the single scratch row buffer, so one painter serves the whole
/// canvas without global state and without allocating.
pub struct StrokePainter {
    scratch: [u8; CANVAS_WIDTH],
}

impl Default for StrokePainter {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokePainter {
    /// Create a painter
    pub fn new() -> Self {
        Self {
            scratch: [0; CANVAS_WIDTH],
        }
    }

    /// Apply one stroke to the canvas
    ///
    /// `surface` is the live display, consulted for pixels past a row's
    /// compressed prefix. Rows whose prefix ends before the stroke are
    /// completed from the surface and recompressed with the wider
    /// coverage, so patching never loses pixels that are still on screen.
    ///
    /// The stroke's bounding box is clipped to the canvas; rows outside
    /// its vertical extent are never touched.
    pub fn apply<S: PixelSurface>(
        &mut self,
        canvas: &mut VirtualCanvas,
        stroke: &Stroke,
        surface: &S,
    ) {
        let radius = stroke.radius.min(MAX_PEN_RADIUS);
        let x = stroke.x as i32;
        let y = stroke.y as i32;
        let r32 = radius as i32;

        let col_l = (x - r32).max(0);
        let col_h = (x + r32).min(CANVAS_WIDTH as i32 - 1);
        let row_l = (y - r32).max(0);
        let row_h = (y + r32).min(CANVAS_HEIGHT as i32 - 1);
        if col_l > col_h || row_l > row_h {
            return;
        }

        let stamp = Stamp::circle(radius);
        let code = stroke.color.as_code();

        for r in row_l..=row_h {
            let stamp_row = (r - (y - r32)) as usize;

            let known = canvas.row(r as usize).decompress(&mut self.scratch);

            // Complete the patch region from the live display when the
            // compressed prefix falls short of it
            let end = known.max(col_h as usize + 1);
            for c in known..end {
                self.scratch[c] = surface.read(r as u16, c as u16).as_code();
            }

            let mut changed = end > known;
            for c in col_l..=col_h {
                let stamp_col = (c - (x - r32)) as usize;
                if stamp.covers(stamp_row, stamp_col) {
                    changed |= self.scratch[c as usize] != code;
                    self.scratch[c as usize] = code;
                }
            }

            if changed {
                canvas.set_row(r as usize, CanvasRow::compress(&self.scratch[..end]));
            }
        }
    }
}
