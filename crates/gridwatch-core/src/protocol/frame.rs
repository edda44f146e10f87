//! Frame validation and wire encoding
//!
//! A frame is a TLV record followed by a 16-bit CRC over the record bytes.
//! Stripping the CRC therefore yields a byte-identical record, so a
//! validated frame converts to a record without re-serialization.

use byteorder::{ByteOrder, LittleEndian};

use super::deframer::{escape, END};
use super::{crc, ProtocolError, MIN_FRAME_SIZE};
use crate::tlv::{Record, RecordError};

/// A deframed, CRC-validated frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The frame payload (a serialized record).
    pub payload: Vec<u8>,
    /// CRC-16 of the payload.
    pub crc: u16,
}

impl Frame {
    /// Create a frame around a payload, computing its CRC.
    pub fn new(payload: Vec<u8>) -> Self {
        let crc = crc::checksum(&payload);
        Self { payload, crc }
    }

    /// Validate a deframed byte range as a frame.
    ///
    /// Rejects ranges too short to carry a record header and CRC, and
    /// ranges whose trailing CRC does not match the payload. Both
    /// rejections condemn only this frame.
    pub fn from_deframed(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < MIN_FRAME_SIZE {
            return Err(ProtocolError::ShortFrame { len: data.len() });
        }

        let (payload, tail) = data.split_at(data.len() - 2);
        let received = LittleEndian::read_u16(tail);
        crc::verify(payload, received)?;

        Ok(Self {
            payload: payload.to_vec(),
            crc: received,
        })
    }

    /// Encode the frame for the wire: payload and CRC escaped, then one
    /// unescaped END delimiter.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(self.payload.len() + 2);
        raw.extend_from_slice(&self.payload);
        raw.extend_from_slice(&self.crc.to_le_bytes());

        let mut wire = escape(&raw);
        wire.push(END);
        wire
    }

    /// Reinterpret the validated payload as a record.
    pub fn into_record(self) -> Result<Record, RecordError> {
        Record::from_bytes(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::super::Deframer;
    use super::*;

    #[test]
    fn wire_roundtrip() {
        let record = Record::Samples(vec![840_000, 0xC0C0_DBDB, 840_100]);
        let frame = Frame::new(record.to_bytes());
        let wire = frame.to_wire();

        let mut deframer = Deframer::new(std::io::Cursor::new(wire));
        let mut buf = [0u8; 64];
        let len = deframer.read_frame(&mut buf).unwrap().unwrap();

        let received = Frame::from_deframed(&buf[..len]).unwrap();
        assert_eq!(received.payload, frame.payload);
        assert_eq!(received.into_record().unwrap(), record);
    }

    #[test]
    fn corrupted_crc_rejects_restored_crc_accepts() {
        let frame = Frame::new(Record::OnePulsePerSecond(42_000_000).to_bytes());
        let mut raw = frame.payload.clone();
        raw.extend_from_slice(&frame.crc.to_le_bytes());

        let tail = raw.len() - 1;
        raw[tail] ^= 0xFF;
        assert!(matches!(
            Frame::from_deframed(&raw),
            Err(ProtocolError::CrcMismatch { .. })
        ));

        raw[tail] ^= 0xFF;
        assert!(Frame::from_deframed(&raw).is_ok());
    }

    #[test]
    fn corrupted_payload_is_rejected() {
        let frame = Frame::new(Record::WallClockTime(123_456_789).to_bytes());
        let mut raw = frame.payload.clone();
        raw.extend_from_slice(&frame.crc.to_le_bytes());

        raw[5] ^= 0x01;
        assert!(matches!(
            Frame::from_deframed(&raw),
            Err(ProtocolError::CrcMismatch { .. })
        ));
    }

    #[test]
    fn short_frame_is_rejected() {
        assert!(matches!(
            Frame::from_deframed(&[1, 2, 3, 4, 5]),
            Err(ProtocolError::ShortFrame { len: 5 })
        ));
    }
}
