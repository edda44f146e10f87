//! Type-length-value record codec
//!
//! All pipeline stages exchange measurements as TLV records: a 2-byte type
//! tag, a 2-byte value length and the value bytes, all little-endian. The
//! same layout is used on the wire, where a frame is simply a record with a
//! trailing CRC, so validated frames convert to records without
//! re-serialization.

use std::io::{self, Read, Write};

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

/// Type tag of a samples record.
pub const TAG_SAMPLES: u16 = 0;
/// Type tag of a 1PPS calibration record.
pub const TAG_ONE_PPS: u16 = 1;
/// Type tag of a wallclock timestamp record.
pub const TAG_WALL_CLOCK: u16 = 2;

/// Maximum number of period counts in one samples record.
pub const MAX_SAMPLE_COUNT: usize = 1000;

/// Maximum value length in bytes of any record.
pub const MAX_VALUE_LEN: usize = MAX_SAMPLE_COUNT * 4;

/// Size of the type + length header in bytes.
pub const HEADER_LEN: usize = 4;

/// Errors raised by the record codec.
///
/// Everything here except `Io` means the stream can no longer be trusted to
/// be byte-aligned; callers must stop reading rather than resynchronize.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("stream ended in the middle of a record")]
    Truncated,

    #[error("value length {length} exceeds the maximum record size")]
    Oversized { length: u16 },

    #[error("tag {tag} carries invalid value length {length}")]
    InvalidLength { tag: u16, length: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// One measurement record.
///
/// Each constructor holds only its own payload; type tag and value length
/// are derived, so they cannot drift out of sync with the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Clock period counts between consecutive mains zero crossings.
    Samples(Vec<u32>),
    /// Measured sampling clock frequency in Hz, from the 1PPS reference.
    OnePulsePerSecond(u32),
    /// Nanoseconds since the Unix epoch.
    WallClockTime(u64),
    /// A record with an unrecognized type tag, preserved verbatim so
    /// filters can pass it through unchanged.
    Unknown {
        /// The unrecognized type tag.
        tag: u16,
        /// The raw value bytes.
        value: Vec<u8>,
    },
}

impl Record {
    /// The record's type tag.
    pub fn tag(&self) -> u16 {
        match self {
            Record::Samples(_) => TAG_SAMPLES,
            Record::OnePulsePerSecond(_) => TAG_ONE_PPS,
            Record::WallClockTime(_) => TAG_WALL_CLOCK,
            Record::Unknown { tag, .. } => *tag,
        }
    }

    /// Byte length of the value part.
    pub fn value_len(&self) -> usize {
        match self {
            Record::Samples(samples) => samples.len() * 4,
            Record::OnePulsePerSecond(_) => 4,
            Record::WallClockTime(_) => 8,
            Record::Unknown { value, .. } => value.len(),
        }
    }

    /// Serialize the record (header and value) to a byte buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let value_len = self.value_len();
        debug_assert!(value_len <= MAX_VALUE_LEN);

        let mut bytes = Vec::with_capacity(HEADER_LEN + value_len);
        let mut header = [0u8; HEADER_LEN];
        LittleEndian::write_u16(&mut header[0..2], self.tag());
        LittleEndian::write_u16(&mut header[2..4], value_len as u16);
        bytes.extend_from_slice(&header);

        match self {
            Record::Samples(samples) => {
                for &sample in samples {
                    bytes.extend_from_slice(&sample.to_le_bytes());
                }
            }
            Record::OnePulsePerSecond(clock_hz) => {
                bytes.extend_from_slice(&clock_hz.to_le_bytes());
            }
            Record::WallClockTime(nanos) => {
                bytes.extend_from_slice(&nanos.to_le_bytes());
            }
            Record::Unknown { value, .. } => {
                bytes.extend_from_slice(value);
            }
        }

        bytes
    }

    /// Decode a record from a contiguous byte buffer, e.g. the payload of a
    /// validated frame. Bytes beyond the declared value length are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Record, RecordError> {
        if bytes.len() < HEADER_LEN {
            return Err(RecordError::Truncated);
        }
        let tag = LittleEndian::read_u16(&bytes[0..2]);
        let length = LittleEndian::read_u16(&bytes[2..4]);
        if bytes.len() < HEADER_LEN + length as usize {
            return Err(RecordError::Truncated);
        }
        decode_value(tag, &bytes[HEADER_LEN..HEADER_LEN + length as usize])
    }
}

fn decode_value(tag: u16, value: &[u8]) -> Result<Record, RecordError> {
    let length = value.len() as u16;
    if value.len() > MAX_VALUE_LEN {
        return Err(RecordError::Oversized { length });
    }

    match tag {
        TAG_SAMPLES => {
            // Whole u32s only; a trailing remainder is ignored, the way the
            // sensor firmware divides the length.
            let samples = value
                .chunks_exact(4)
                .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect();
            Ok(Record::Samples(samples))
        }
        TAG_ONE_PPS => {
            if value.len() != 4 {
                return Err(RecordError::InvalidLength { tag, length });
            }
            Ok(Record::OnePulsePerSecond(u32::from_le_bytes([
                value[0], value[1], value[2], value[3],
            ])))
        }
        TAG_WALL_CLOCK => {
            if value.len() != 8 {
                return Err(RecordError::InvalidLength { tag, length });
            }
            let mut buf = [0u8; 8];
            buf.copy_from_slice(value);
            Ok(Record::WallClockTime(u64::from_le_bytes(buf)))
        }
        _ => Ok(Record::Unknown {
            tag,
            value: value.to_vec(),
        }),
    }
}

/// Read the next record from a byte stream.
///
/// Returns `Ok(None)` on clean end-of-stream, i.e. exhaustion before the
/// first header byte. End-of-stream anywhere later is a truncated record.
pub fn read_record<R: Read>(reader: &mut R) -> Result<Option<Record>, RecordError> {
    let mut header = [0u8; HEADER_LEN];
    match read_header(reader, &mut header)? {
        HeaderRead::Eof => return Ok(None),
        HeaderRead::Complete => {}
    }

    let tag = LittleEndian::read_u16(&header[0..2]);
    let length = LittleEndian::read_u16(&header[2..4]);
    if length as usize > MAX_VALUE_LEN {
        return Err(RecordError::Oversized { length });
    }

    let mut value = vec![0u8; length as usize];
    reader.read_exact(&mut value).map_err(|err| {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            RecordError::Truncated
        } else {
            RecordError::Io(err)
        }
    })?;

    decode_value(tag, &value).map(Some)
}

enum HeaderRead {
    Complete,
    Eof,
}

// Distinguishes clean end-of-stream (zero header bytes available) from a
// record cut off mid-header.
fn read_header<R: Read>(reader: &mut R, header: &mut [u8]) -> Result<HeaderRead, RecordError> {
    let mut filled = 0;
    while filled < header.len() {
        let nread = reader.read(&mut header[filled..])?;
        if nread == 0 {
            if filled == 0 {
                return Ok(HeaderRead::Eof);
            }
            return Err(RecordError::Truncated);
        }
        filled += nread;
    }
    Ok(HeaderRead::Complete)
}

/// Write one record to a byte stream.
///
/// The record is serialized to a single buffer first and handed to the sink
/// in one write, so a failure never leaves a defined partial record behind.
pub fn write_record<W: Write>(writer: &mut W, record: &Record) -> io::Result<()> {
    writer.write_all(&record.to_bytes())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn roundtrip_samples() {
        let record = Record::Samples(vec![840_000, 840_120, 839_910]);
        let bytes = record.to_bytes();
        assert_eq!(bytes.len(), HEADER_LEN + 12);

        let decoded = read_record(&mut Cursor::new(&bytes)).unwrap().unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.to_bytes(), bytes);
    }

    #[test]
    fn roundtrip_one_pps() {
        let record = Record::OnePulsePerSecond(42_000_123);
        let bytes = record.to_bytes();
        let decoded = read_record(&mut Cursor::new(&bytes)).unwrap().unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.to_bytes(), bytes);
    }

    #[test]
    fn roundtrip_wall_clock() {
        let record = Record::WallClockTime(1_660_000_000_123_456_789);
        let bytes = record.to_bytes();
        let decoded = read_record(&mut Cursor::new(&bytes)).unwrap().unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.to_bytes(), bytes);
    }

    #[test]
    fn unknown_tag_is_preserved_verbatim() {
        let record = Record::Unknown {
            tag: 7,
            value: vec![1, 2, 3, 4, 5],
        };
        let bytes = record.to_bytes();
        let decoded = read_record(&mut Cursor::new(&bytes)).unwrap().unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.to_bytes(), bytes);
    }

    #[test]
    fn wire_layout_is_little_endian() {
        let bytes = Record::OnePulsePerSecond(0x0403_0201).to_bytes();
        assert_eq!(bytes, vec![1, 0, 4, 0, 0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn clean_eof_yields_none() {
        let mut empty = Cursor::new(Vec::new());
        assert!(read_record(&mut empty).unwrap().is_none());
    }

    #[test]
    fn eof_mid_header_is_truncation() {
        let mut short = Cursor::new(vec![0, 0, 4]);
        assert!(matches!(
            read_record(&mut short),
            Err(RecordError::Truncated)
        ));
    }

    #[test]
    fn eof_mid_value_is_truncation() {
        let mut bytes = Record::OnePulsePerSecond(1).to_bytes();
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            read_record(&mut Cursor::new(&bytes)),
            Err(RecordError::Truncated)
        ));
    }

    #[test]
    fn oversized_length_is_fatal() {
        let mut bytes = vec![0u8; HEADER_LEN];
        LittleEndian::write_u16(&mut bytes[0..2], TAG_SAMPLES);
        LittleEndian::write_u16(&mut bytes[2..4], (MAX_VALUE_LEN + 4) as u16);
        assert!(matches!(
            read_record(&mut Cursor::new(&bytes)),
            Err(RecordError::Oversized { .. })
        ));
    }

    #[test]
    fn fixed_size_tag_with_wrong_length_is_fatal() {
        let mut bytes = vec![0u8; HEADER_LEN + 2];
        LittleEndian::write_u16(&mut bytes[0..2], TAG_ONE_PPS);
        LittleEndian::write_u16(&mut bytes[2..4], 2);
        assert!(matches!(
            read_record(&mut Cursor::new(&bytes)),
            Err(RecordError::InvalidLength { tag: TAG_ONE_PPS, length: 2 })
        ));
    }

    #[test]
    fn samples_remainder_bytes_are_ignored() {
        let mut bytes = vec![0u8; HEADER_LEN + 6];
        LittleEndian::write_u16(&mut bytes[0..2], TAG_SAMPLES);
        LittleEndian::write_u16(&mut bytes[2..4], 6);
        LittleEndian::write_u32(&mut bytes[4..8], 840_000);

        let decoded = read_record(&mut Cursor::new(&bytes)).unwrap().unwrap();
        assert_eq!(decoded, Record::Samples(vec![840_000]));
    }

    #[test]
    fn consecutive_records_share_a_stream() {
        let mut stream = Vec::new();
        let records = vec![
            Record::OnePulsePerSecond(42_000_000),
            Record::Samples(vec![840_000, 840_001]),
            Record::WallClockTime(99),
        ];
        for record in &records {
            write_record(&mut stream, record).unwrap();
        }

        let mut cursor = Cursor::new(&stream);
        let mut decoded = Vec::new();
        while let Some(record) = read_record(&mut cursor).unwrap() {
            decoded.push(record);
        }
        assert_eq!(decoded, records);
    }
}
