//! Capture source
//!
//! Head of the pipeline: deframes the raw sensor channel, gates every frame
//! on its CRC and writes the surviving records to the output stream.
//! Roughly once per second a wallclock marker record is appended so
//! downstream stages can reference samples to wallclock time.

use std::io::{Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::protocol::{Deframer, Frame, ProtocolError, MAX_FRAME_SIZE};
use crate::tlv::{write_record, Record};

const MARKER_INTERVAL_NS: u64 = 1_000_000_000;

/// Frame-to-record converter over one continuous byte channel.
pub struct Capture<R> {
    deframer: Deframer<R>,
    frame_buf: Vec<u8>,
    last_marker_ns: u64,
}

impl<R: Read> Capture<R> {
    /// Wrap a raw byte channel, typically an open serial port.
    pub fn new(channel: R) -> Self {
        Self {
            deframer: Deframer::new(channel),
            frame_buf: vec![0u8; MAX_FRAME_SIZE],
            last_marker_ns: 0,
        }
    }

    /// Pump the channel until it is exhausted.
    ///
    /// Frames failing the length or CRC gate are dropped with a warning;
    /// the stream continues with the next frame. A record that cannot be
    /// decoded from a validated frame means lost byte alignment and ends
    /// the capture with an error.
    pub fn run<W: Write>(&mut self, mut output: W) -> Result<(), ProtocolError> {
        while let Some(len) = self.deframer.read_frame(&mut self.frame_buf)? {
            let frame = match Frame::from_deframed(&self.frame_buf[..len]) {
                Ok(frame) => frame,
                Err(
                    err @ (ProtocolError::ShortFrame { .. } | ProtocolError::CrcMismatch { .. }),
                ) => {
                    tracing::warn!(%err, "ignoring frame");
                    continue;
                }
                Err(err) => return Err(err),
            };

            let record = frame.into_record()?;
            write_record(&mut output, &record)?;
            output.flush()?;

            self.emit_marker_if_due(&mut output)?;
        }
        Ok(())
    }

    fn emit_marker_if_due<W: Write>(&mut self, output: &mut W) -> Result<(), ProtocolError> {
        let now_ns = wallclock_ns()?;
        if now_ns.saturating_sub(self.last_marker_ns) >= MARKER_INTERVAL_NS {
            write_record(output, &Record::WallClockTime(now_ns))?;
            output.flush()?;
            self.last_marker_ns = now_ns;
        }
        Ok(())
    }
}

fn wallclock_ns() -> Result<u64, ProtocolError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    Ok(elapsed.as_nanos() as u64)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::protocol::crc;
    use crate::protocol::deframer::{escape, END};
    use crate::tlv::read_record;

    fn decode_all(output: Vec<u8>) -> Vec<Record> {
        let mut cursor = Cursor::new(output);
        let mut records = Vec::new();
        while let Some(record) = read_record(&mut cursor).unwrap() {
            records.push(record);
        }
        records
    }

    // Wallclock markers are injected on the capture host's clock; tests
    // only assert on the sensor records around them.
    fn sensor_records(output: Vec<u8>) -> Vec<Record> {
        decode_all(output)
            .into_iter()
            .filter(|record| !matches!(record, Record::WallClockTime(_)))
            .collect()
    }

    #[test]
    fn valid_frames_become_records() {
        let records = vec![
            Record::OnePulsePerSecond(42_000_000),
            Record::Samples(vec![840_000, 840_100]),
        ];
        let mut wire = Vec::new();
        for record in &records {
            wire.extend(Frame::new(record.to_bytes()).to_wire());
        }

        let mut output = Vec::new();
        Capture::new(Cursor::new(wire)).run(&mut output).unwrap();
        assert_eq!(sensor_records(output), records);
    }

    #[test]
    fn marker_is_injected_after_the_first_record() {
        let wire = Frame::new(Record::OnePulsePerSecond(1).to_bytes()).to_wire();
        let mut output = Vec::new();
        Capture::new(Cursor::new(wire)).run(&mut output).unwrap();

        let records = decode_all(output);
        assert_eq!(records.len(), 2);
        assert!(matches!(records[1], Record::WallClockTime(_)));
    }

    #[test]
    fn corrupt_frame_is_dropped_stream_continues() {
        let good = Record::Samples(vec![840_000]);

        let mut bad_raw = Record::OnePulsePerSecond(7).to_bytes();
        let crc = crc::checksum(&bad_raw) ^ 0x0101;
        bad_raw.extend_from_slice(&crc.to_le_bytes());
        let mut wire = escape(&bad_raw);
        wire.push(END);

        wire.extend(Frame::new(good.to_bytes()).to_wire());

        let mut output = Vec::new();
        Capture::new(Cursor::new(wire)).run(&mut output).unwrap();
        assert_eq!(sensor_records(output), vec![good]);
    }

    #[test]
    fn short_frame_is_dropped_stream_continues() {
        let mut wire = vec![0x01, 0x02, 0x03, END];
        let good = Record::WallClockTime(42);
        wire.extend(Frame::new(good.to_bytes()).to_wire());

        let mut output = Vec::new();
        Capture::new(Cursor::new(wire)).run(&mut output).unwrap();
        // The good record is a wallclock record here, so compare directly.
        let records = decode_all(output);
        assert!(records.contains(&good));
    }

    #[test]
    fn empty_frames_on_the_wire_produce_nothing() {
        let wire = vec![END, END, END];
        let mut output = Vec::new();
        Capture::new(Cursor::new(wire)).run(&mut output).unwrap();
        assert!(output.is_empty());
    }
}
