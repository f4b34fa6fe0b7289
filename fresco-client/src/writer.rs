//! Bounded write buffering with sticky failure detection
//!
//! A canvas save issues hundreds of small writes (a mode byte here, a few
//! segment words there). Pushing each one at the socket separately is
//! what makes transfers slow on this link, so writes accumulate in a
//! fixed buffer and go out in batches.
//!
//! Failure handling is deliberately flag-based: mid-stream there is no
//! way to recover a half-written row anyway, so errors and short writes
//! latch a sticky flag the caller polls at row boundaries, keeping the
//! hot path free of per-write error plumbing.

use embedded_io::Write;

/// Write buffer capacity used for canvas transfers
pub const WRITE_BUFFER_CAPACITY: usize = 1024;

/// Fixed-capacity write buffer over a byte-stream connection
pub struct BufferedWriter<W: Write, const N: usize> {
    conn: W,
    buf: [u8; N],
    used: usize,
    ok: bool,
}

impl<W: Write, const N: usize> BufferedWriter<W, N> {
    /// Wrap a connection
    pub fn new(conn: W) -> Self {
        Self {
            conn,
            buf: [0; N],
            used: 0,
            ok: true,
        }
    }

    /// Append bytes, flushing whenever the buffer fills
    pub fn write(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            if self.used == N {
                self.flush();
            }

            let n = bytes.len().min(N - self.used);
            self.buf[self.used..self.used + n].copy_from_slice(&bytes[..n]);
            self.used += n;
            bytes = &bytes[n..];
        }
    }

    /// Push the buffered bytes to the connection in one write
    ///
    /// An error or a short write latches the failure flag; the buffer is
    /// discarded either way so the stream position stays predictable.
    pub fn flush(&mut self) {
        if self.used == 0 {
            return;
        }

        match self.conn.write(&self.buf[..self.used]) {
            Ok(n) if n == self.used => {}
            _ => self.ok = false,
        }
        self.used = 0;
    }

    /// Whether any write so far has failed
    pub fn failed(&self) -> bool {
        !self.ok
    }

    /// Flush everything through to the connection and report success
    ///
    /// Consumes the writer; the connection is dropped (and with it,
    /// closed) when the returned value goes out of scope with it.
    pub fn finish(mut self) -> bool {
        self.flush();
        if self.conn.flush().is_err() {
            self.ok = false;
        }
        self.ok
    }
}
