//! Whole-canvas save and load
//!
//! Both operations are linear row-by-row state machines with no retries:
//! the first failure is terminal for the attempt and reported upward. The
//! UI decides whether to try again.
//!
//! The save path never mutates the canvas. The load path updates the
//! display and the canvas one row at a time; on failure the rows already
//! applied stay applied (a full staging canvas would double the memory
//! budget, so partial loads are recovered by loading again rather than
//! rolled back).

use embedded_io::{Read, Write};

use fresco_canvas::{
    CompressedRow, PaletteColor, PixelSurface, VirtualCanvas, CANVAS_HEIGHT, CANVAS_WIDTH,
};
use fresco_protocol::{
    max_wire_segments, Header, Opcode, RowRecord, WireError, HEADER_LEN, MAX_RECORD_LEN, MODE_RAW,
};

use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::connector::Connector;
use crate::writer::{BufferedWriter, WRITE_BUFFER_CAPACITY};

/// Segment budget of the save path's per-row recompression
///
/// Past this count the segment encoding is larger than raw, so there is
/// no point compressing further.
const WIRE_SEGMENTS: usize = max_wire_segments(CANVAS_WIDTH);

/// How a transfer failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// The server could not be reached
    Connection,
    /// The connection dropped or went short mid-transfer
    Communication,
    /// The peer sent bytes that violate the wire format
    Protocol(WireError),
    /// The user abandoned the transfer between rows
    Cancelled,
}

/// Drives canvas transfers against the storage server
///
/// Owns the scratch row and record buffers, so one client instance serves
/// every transfer without global state.
pub struct SyncClient {
    config: ClientConfig,
    scratch: [u8; CANVAS_WIDTH],
    record: [u8; MAX_RECORD_LEN],
}

impl Default for SyncClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl SyncClient {
    /// Create a client
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            scratch: [0; CANVAS_WIDTH],
            record: [0; MAX_RECORD_LEN],
        }
    }

    /// Stream the canvas to the server's `slot`
    ///
    /// Each row is brought to full width (completing overflowed rows from
    /// the live display) and recompressed for the wire; rows that do not
    /// compress go out raw. The canvas itself is never mutated.
    pub fn save<C, S>(
        &mut self,
        slot: u8,
        canvas: &VirtualCanvas,
        surface: &S,
        connector: &mut C,
        cancel: &CancelToken,
    ) -> Result<(), SyncError>
    where
        C: Connector,
        S: PixelSurface,
    {
        let header = Header::new(
            Opcode::Save,
            slot,
            CANVAS_HEIGHT as u16,
            CANVAS_WIDTH as u16,
        )
        .map_err(SyncError::Protocol)?;

        let conn = self.connect(connector)?;
        let mut writer = BufferedWriter::<_, WRITE_BUFFER_CAPACITY>::new(conn);

        let mut head = [0u8; HEADER_LEN];
        let len = header.encode(&mut head).map_err(SyncError::Protocol)?;
        writer.write(&head[..len]);
        if writer.failed() {
            return Err(SyncError::Communication);
        }

        for r in 0..CANVAS_HEIGHT {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }

            let known = canvas.row(r).decompress(&mut self.scratch);
            for c in known..CANVAS_WIDTH {
                self.scratch[c] = surface.read(r as u16, c as u16).as_code();
            }

            let wire = CompressedRow::<WIRE_SEGMENTS>::compress(&self.scratch);
            let record = if wire.covers(CANVAS_WIDTH) {
                RowRecord::Segments(wire.segments())
            } else {
                RowRecord::Raw(&self.scratch)
            };

            let len = record
                .encode_into(&mut self.record)
                .map_err(SyncError::Protocol)?;
            writer.write(&self.record[..len]);
            if writer.failed() {
                return Err(SyncError::Communication);
            }
        }

        if writer.finish() {
            Ok(())
        } else {
            Err(SyncError::Communication)
        }
    }

    /// Stream the server's `slot` into the canvas and onto the display
    ///
    /// Every received row is written to the display and recompressed into
    /// the canvas, giving the painter a fresh baseline. A failure leaves
    /// the rows already received in place.
    pub fn load<C, S>(
        &mut self,
        slot: u8,
        canvas: &mut VirtualCanvas,
        surface: &mut S,
        connector: &mut C,
        cancel: &CancelToken,
    ) -> Result<(), SyncError>
    where
        C: Connector,
        S: PixelSurface,
    {
        let header = Header::new(
            Opcode::Load,
            slot,
            CANVAS_HEIGHT as u16,
            CANVAS_WIDTH as u16,
        )
        .map_err(SyncError::Protocol)?;

        let mut conn = self.connect(connector)?;

        let mut head = [0u8; HEADER_LEN];
        let len = header.encode(&mut head).map_err(SyncError::Protocol)?;
        conn.write_all(&head[..len])
            .map_err(|_| SyncError::Communication)?;
        conn.flush().map_err(|_| SyncError::Communication)?;

        for r in 0..CANVAS_HEIGHT {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }

            let mut mode = [0u8; 1];
            conn.read_exact(&mut mode)
                .map_err(|_| SyncError::Communication)?;

            let body_len =
                RowRecord::body_len(mode[0], CANVAS_WIDTH).map_err(SyncError::Protocol)?;
            conn.read_exact(&mut self.record[..body_len])
                .map_err(|_| SyncError::Communication)?;

            if mode[0] == MODE_RAW {
                RowRecord::decode_raw(&self.record[..body_len], &mut self.scratch)
            } else {
                RowRecord::decode_segments(&self.record[..body_len], CANVAS_WIDTH, &mut self.scratch)
            }
            .map_err(SyncError::Protocol)?;

            for c in 0..CANVAS_WIDTH {
                let color = PaletteColor::from_code(self.scratch[c])
                    .ok_or(SyncError::Protocol(WireError::InvalidCode))?;
                surface.write(r as u16, c as u16, color);
            }
            canvas.load_row(r, &self.scratch);
        }

        Ok(())
    }

    /// Establish a connection, retrying up to the configured attempts
    fn connect<C: Connector>(&self, connector: &mut C) -> Result<C::Conn, SyncError> {
        let attempts = self.config.connect_attempts.max(1);
        for _ in 0..attempts {
            if let Ok(conn) = connector.connect() {
                return Ok(conn);
            }
        }
        Err(SyncError::Connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use fresco_canvas::{Stroke, StrokePainter};
    use std::rc::Rc;
    use std::vec::Vec;

    /// In-memory connection: records writes, serves a scripted read stream
    struct MemConn {
        tx: Rc<RefCell<Vec<u8>>>,
        rx: Vec<u8>,
        pos: usize,
        accept_limit: Option<usize>,
    }

    impl embedded_io::ErrorType for MemConn {
        type Error = Infallible;
    }

    impl Write for MemConn {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
            let n = self.accept_limit.map_or(buf.len(), |l| buf.len().min(l));
            self.tx.borrow_mut().extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    impl Read for MemConn {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
            let remaining = self.rx.len() - self.pos;
            let n = buf.len().min(remaining);
            buf[..n].copy_from_slice(&self.rx[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    struct MemConnector {
        conn: Option<MemConn>,
        attempts: usize,
    }

    impl MemConnector {
        fn serving(rx: Vec<u8>, tx: Rc<RefCell<Vec<u8>>>) -> Self {
            Self {
                conn: Some(MemConn {
                    tx,
                    rx,
                    pos: 0,
                    accept_limit: None,
                }),
                attempts: 0,
            }
        }

        fn unreachable() -> Self {
            Self {
                conn: None,
                attempts: 0,
            }
        }
    }

    impl Connector for MemConnector {
        type Conn = MemConn;
        type Error = ();

        fn connect(&mut self) -> Result<MemConn, ()> {
            self.attempts += 1;
            self.conn.take().ok_or(())
        }
    }

    /// Full-bitmap stand-in for the device display
    struct Frame {
        pixels: Vec<u8>,
    }

    impl Frame {
        fn new() -> Self {
            Self {
                pixels: std::vec![PaletteColor::Black.as_code(); CANVAS_WIDTH * CANVAS_HEIGHT],
            }
        }
    }

    impl PixelSurface for Frame {
        fn read(&self, row: u16, col: u16) -> PaletteColor {
            let code = self.pixels[row as usize * CANVAS_WIDTH + col as usize];
            PaletteColor::from_code(code).unwrap()
        }

        fn write(&mut self, row: u16, col: u16, color: PaletteColor) {
            self.pixels[row as usize * CANVAS_WIDTH + col as usize] = color.as_code();
        }
    }

    fn painted_canvas() -> VirtualCanvas {
        let mut canvas = VirtualCanvas::new();
        let mut painter = StrokePainter::new();
        let frame = Frame::new();

        for (x, y, color) in [
            (50u16, 40u16, PaletteColor::Red),
            (120, 41, PaletteColor::Yellow),
            (200, 250, PaletteColor::White),
        ] {
            let stroke = Stroke {
                x,
                y,
                radius: 3,
                color,
            };
            painter.apply(&mut canvas, &stroke, &frame);
        }
        canvas
    }

    /// Walk a save stream and check it frames exactly
    fn assert_well_framed(bytes: &[u8]) {
        assert_eq!(bytes[0], 1); // save opcode
        assert_eq!(
            u16::from_le_bytes([bytes[2], bytes[3]]),
            CANVAS_HEIGHT as u16
        );
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), CANVAS_WIDTH as u16);

        let mut pos = HEADER_LEN;
        for _ in 0..CANVAS_HEIGHT {
            let mode = bytes[pos];
            pos += 1;
            pos += if mode == MODE_RAW {
                CANVAS_WIDTH
            } else {
                2 * mode as usize
            };
        }
        assert_eq!(pos, bytes.len());
    }

    #[test]
    fn test_save_stream_framing() {
        let canvas = painted_canvas();
        let frame = Frame::new();
        let tx = Rc::new(RefCell::new(Vec::new()));
        let mut connector = MemConnector::serving(Vec::new(), tx.clone());
        let cancel = CancelToken::new();

        let mut client = SyncClient::default();
        client
            .save(1, &canvas, &frame, &mut connector, &cancel)
            .unwrap();

        assert_well_framed(&tx.borrow());
    }

    #[test]
    fn test_save_then_load_restores_canvas_and_display() {
        let canvas = painted_canvas();
        let frame = Frame::new();
        let tx = Rc::new(RefCell::new(Vec::new()));
        let mut connector = MemConnector::serving(Vec::new(), tx.clone());
        let cancel = CancelToken::new();

        let mut client = SyncClient::default();
        client
            .save(0, &canvas, &frame, &mut connector, &cancel)
            .unwrap();

        // The server echoes the stored row records back on load
        let rows = tx.borrow()[HEADER_LEN..].to_vec();
        let mut restored = VirtualCanvas::new();
        let mut screen = Frame::new();
        let mut connector = MemConnector::serving(rows, Rc::new(RefCell::new(Vec::new())));
        client
            .load(0, &mut restored, &mut screen, &mut connector, &cancel)
            .unwrap();

        for r in 0..CANVAS_HEIGHT {
            assert_eq!(restored.row(r), canvas.row(r), "row {} differs", r);
        }
        // A stroke pixel landed on the display
        assert_eq!(screen.read(40, 50), PaletteColor::Red);
        assert_eq!(screen.read(0, 0), PaletteColor::Black);
    }

    #[test]
    fn test_save_unreachable_server() {
        let canvas = VirtualCanvas::new();
        let frame = Frame::new();
        let mut connector = MemConnector::unreachable();
        let cancel = CancelToken::new();

        let mut client = SyncClient::new(ClientConfig {
            connect_attempts: 3,
        });
        let result = client.save(0, &canvas, &frame, &mut connector, &cancel);

        assert_eq!(result, Err(SyncError::Connection));
        assert_eq!(connector.attempts, 3);
    }

    #[test]
    fn test_save_short_write_is_communication_failure() {
        let canvas = VirtualCanvas::new();
        let frame = Frame::new();
        let tx = Rc::new(RefCell::new(Vec::new()));
        let mut connector = MemConnector::serving(Vec::new(), tx);
        if let Some(conn) = connector.conn.as_mut() {
            conn.accept_limit = Some(100);
        }
        let cancel = CancelToken::new();

        let mut client = SyncClient::default();
        let result = client.save(0, &canvas, &frame, &mut connector, &cancel);

        assert_eq!(result, Err(SyncError::Communication));
    }

    #[test]
    fn test_load_short_stream_is_communication_failure() {
        let mut canvas = VirtualCanvas::new();
        let mut frame = Frame::new();
        // One raw row record, then the stream ends
        let mut rows = std::vec![MODE_RAW];
        rows.extend_from_slice(&[8u8; CANVAS_WIDTH]);
        let mut connector = MemConnector::serving(rows, Rc::new(RefCell::new(Vec::new())));
        let cancel = CancelToken::new();

        let mut client = SyncClient::default();
        let result = client.load(0, &mut canvas, &mut frame, &mut connector, &cancel);

        assert_eq!(result, Err(SyncError::Communication));
    }

    #[test]
    fn test_load_oversized_mode_is_protocol_error() {
        let mut canvas = VirtualCanvas::new();
        let mut frame = Frame::new();
        // 200 segments could never legitimately describe a 310-pixel row
        let mut connector =
            MemConnector::serving(std::vec![200u8; 500], Rc::new(RefCell::new(Vec::new())));
        let cancel = CancelToken::new();

        let mut client = SyncClient::default();
        let result = client.load(0, &mut canvas, &mut frame, &mut connector, &cancel);

        assert_eq!(result, Err(SyncError::Protocol(WireError::InvalidMode)));
    }

    #[test]
    fn test_cancelled_save_aborts() {
        let canvas = VirtualCanvas::new();
        let frame = Frame::new();
        let tx = Rc::new(RefCell::new(Vec::new()));
        let mut connector = MemConnector::serving(Vec::new(), tx.clone());
        let cancel = CancelToken::new();
        cancel.cancel();

        let mut client = SyncClient::default();
        let result = client.save(0, &canvas, &frame, &mut connector, &cancel);

        assert_eq!(result, Err(SyncError::Cancelled));
        // Nothing but (at most) the header made it out
        assert!(tx.borrow().len() <= HEADER_LEN);
    }

    #[test]
    fn test_load_busy_row_becomes_prefix_baseline() {
        let mut canvas = VirtualCanvas::new();
        let mut frame = Frame::new();

        // Stream: first row alternates every pixel (raw), the rest are
        // single-segment background rows
        let mut rows = std::vec![MODE_RAW];
        for c in 0..CANVAS_WIDTH {
            rows.push((c % 2) as u8);
        }
        let bg = fresco_canvas::Segment::new(8, CANVAS_WIDTH as u16).pack();
        for _ in 1..CANVAS_HEIGHT {
            rows.push(1);
            rows.extend_from_slice(&bg.to_le_bytes());
        }
        let mut connector = MemConnector::serving(rows, Rc::new(RefCell::new(Vec::new())));
        let cancel = CancelToken::new();

        let mut client = SyncClient::default();
        client
            .load(0, &mut canvas, &mut frame, &mut connector, &cancel)
            .unwrap();

        // The display holds the whole busy row even though the canvas
        // only encodes a prefix of it
        assert!(canvas.row(0).pixel_count() < CANVAS_WIDTH);
        assert_eq!(frame.read(0, 309), PaletteColor::Green);
        assert!(canvas.row(1).covers(CANVAS_WIDTH));
    }

    #[test]
    fn test_save_reads_display_past_row_prefix() {
        let mut canvas = VirtualCanvas::new();
        let mut frame = Frame::new();

        // Row 5 encodes only 10 pixels; the display knows the rest
        canvas.load_row(5, &[0u8; 10]);
        frame.write(5, 300, PaletteColor::Magenta);
        for c in 0..10 {
            frame.write(5, c, PaletteColor::Red);
        }

        let tx = Rc::new(RefCell::new(Vec::new()));
        let mut connector = MemConnector::serving(Vec::new(), tx.clone());
        let cancel = CancelToken::new();

        let mut client = SyncClient::default();
        client
            .save(0, &canvas, &frame, &mut connector, &cancel)
            .unwrap();

        // Decode row 5 from the stream and check the display pixel survived
        let bytes = tx.borrow();
        let mut pos = HEADER_LEN;
        for _ in 0..5 {
            let mode = bytes[pos];
            pos += 1 + if mode == MODE_RAW {
                CANVAS_WIDTH
            } else {
                2 * mode as usize
            };
        }
        let mode = bytes[pos];
        assert_ne!(mode, MODE_RAW);
        let mut out = [0xFFu8; CANVAS_WIDTH];
        RowRecord::decode_segments(
            &bytes[pos + 1..pos + 1 + 2 * mode as usize],
            CANVAS_WIDTH,
            &mut out,
        )
        .unwrap();
        assert_eq!(out[0], PaletteColor::Red.as_code());
        assert_eq!(out[300], PaletteColor::Magenta.as_code());
        assert_eq!(out[150], PaletteColor::Black.as_code());
    }
}
