//! Compressed canvas state for the Fresco paint device
//!
//! The device drives a touchscreen canvas far larger than its RAM budget
//! allows as a bitmap, so the drawing surface is tracked as one run-length
//! compressed record per row. This crate contains everything needed to keep
//! that state consistent while the user draws:
//!
//! - Fixed 9-color palette with exact RGB565 conversions
//! - Segment codec (bounded run-length encoding with prefix semantics)
//! - Virtual canvas: one bounded compressed record per row
//! - Stroke painter: decompress, patch, recompress only the touched rows
//!
//! A compressed row is allowed to cover only a *prefix* of its pixels: when
//! a row needs more segments than its bounded capacity, compression stops
//! and records how far it got instead of failing. Everything downstream
//! (painter, save path) must consult [`CompressedRow::pixel_count`] and fall
//! back to the live display for the uncovered tail.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod canvas;
pub mod painter;
pub mod palette;
pub mod row;
pub mod segment;
pub mod stamp;
pub mod surface;

pub use canvas::{VirtualCanvas, CANVAS_HEIGHT, CANVAS_WIDTH, MAX_ROW_SEGMENTS};
pub use painter::{Stroke, StrokePainter};
pub use palette::{PaletteColor, BACKGROUND};
pub use row::CompressedRow;
pub use segment::{Segment, MAX_RUN};
pub use stamp::{Stamp, MAX_PEN_RADIUS};
pub use surface::PixelSurface;
