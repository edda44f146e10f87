//! Byte-stuffing frame deframer
//!
//! Frames are delimited by a single unescaped END byte. Payload bytes equal
//! to END or ESC are sent as two-byte escape sequences so the delimiter
//! stays unambiguous. The deframer reads the raw byte channel through an
//! internal refill buffer whose cursor persists across calls; one deframer
//! serves exactly one continuous stream and must never be reset mid-stream.

use std::io::{self, Read};

/// Frame delimiter.
pub const END: u8 = 0xC0;
/// Escape introducer.
pub const ESC: u8 = 0xDB;
/// ESC + ESC_END encodes a literal END byte.
pub const ESC_END: u8 = 0xDC;
/// ESC + ESC_ESC encodes a literal ESC byte.
pub const ESC_ESC: u8 = 0xDD;

const REFILL_CAPACITY: usize = 1024;

/// Stateful reader recovering delimited frames from a raw byte channel.
pub struct Deframer<R> {
    reader: R,
    buf: [u8; REFILL_CAPACITY],
    len: usize,
    pos: usize,
}

impl<R: Read> Deframer<R> {
    /// Wrap a byte channel.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: [0u8; REFILL_CAPACITY],
            len: 0,
            pos: 0,
        }
    }

    // Next raw byte from the channel, refilling the internal buffer when it
    // runs dry. `None` is channel exhaustion.
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pos == self.len {
            let nread = self.reader.read(&mut self.buf)?;
            if nread == 0 {
                return Ok(None);
            }
            self.len = nread;
            self.pos = 0;
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }

    /// Read the next frame into `frame`, resolving escape sequences.
    ///
    /// Returns the decoded length, or `None` once the channel is exhausted.
    /// Empty frames (an END with no accumulated bytes) are skipped without
    /// being reported. A decoded frame longer than `frame` is silently
    /// truncated to the buffer, excess bytes dropped. Exhaustion mid-frame
    /// discards the partial frame with a warning.
    pub fn read_frame(&mut self, frame: &mut [u8]) -> io::Result<Option<usize>> {
        let mut received = 0usize;
        loop {
            let Some(byte) = self.next_byte()? else {
                if received > 0 {
                    tracing::warn!(bytes = received, "channel exhausted mid-frame, discarding partial frame");
                }
                return Ok(None);
            };

            let decoded = match byte {
                END => {
                    if received > 0 {
                        return Ok(Some(received));
                    }
                    // Empty frame: line noise, or a protocol variant that
                    // also sends END at the start of each frame. Skip it.
                    continue;
                }
                ESC => match self.next_byte()? {
                    None => {
                        tracing::warn!(bytes = received, "channel exhausted mid-frame, discarding partial frame");
                        return Ok(None);
                    }
                    Some(ESC_END) => END,
                    Some(ESC_ESC) => ESC,
                    // Protocol violation; the byte goes into the frame
                    // unescaped rather than failing the whole frame.
                    Some(other) => {
                        tracing::debug!(byte = other, "unknown escape sequence, passing byte through");
                        other
                    }
                },
                other => other,
            };

            if received < frame.len() {
                frame[received] = decoded;
                received += 1;
            }
        }
    }
}

/// Escape a byte sequence for transmission: every END and ESC in the input
/// becomes its two-byte escape sequence. The frame delimiter itself is not
/// appended here.
pub fn escape(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 2);
    for &byte in payload {
        match byte {
            END => out.extend_from_slice(&[ESC, ESC_END]),
            ESC => out.extend_from_slice(&[ESC, ESC_ESC]),
            _ => out.push(byte),
        }
    }
    out
}
