//! CRC-16/CCITT frame checksum
//!
//! XMODEM variant: polynomial 0x1021, initial value 0x0000, no reflection.
//! The checksum is the final admission gate for a deframed byte range; a
//! mismatch discards the whole frame.

use crc::{Crc, CRC_16_XMODEM};

use super::ProtocolError;

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Compute the CRC-16/CCITT checksum of a byte range.
pub fn checksum(bytes: &[u8]) -> u16 {
    CRC16.checksum(bytes)
}

/// Check a byte range against a received checksum.
pub fn verify(bytes: &[u8], received: u16) -> Result<(), ProtocolError> {
    let expected = checksum(bytes);
    if expected != received {
        return Err(ProtocolError::CrcMismatch {
            expected,
            actual: received,
        });
    }
    Ok(())
}
