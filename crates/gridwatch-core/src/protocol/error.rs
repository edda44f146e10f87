//! Protocol errors

use thiserror::Error;

use crate::tlv::RecordError;

/// Errors that can occur on the sensor wire.
///
/// `ShortFrame` and `CrcMismatch` condemn a single frame; the stream stays
/// usable and the caller skips to the next frame. Everything else is fatal
/// for the stream.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("serial port error: {0}")]
    SerialError(String),

    #[error("frame too short: {len} bytes")]
    ShortFrame { len: usize },

    #[error("CRC mismatch: expected {expected:#06x}, got {actual:#06x}")]
    CrcMismatch { expected: u16, actual: u16 },

    #[error("malformed record: {0}")]
    Record(#[from] RecordError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
