//! Sensor wire protocol
//!
//! The sensor sends byte-stuffed frames over an asynchronous serial link.
//! Each frame is a TLV record followed by a 16-bit CRC, escaped and
//! delimited per the byte-stuffing rules of [`deframer`].

pub mod crc;
pub mod deframer;
mod error;
mod frame;
pub mod serial;

pub use deframer::{escape, Deframer};
pub use error::ProtocolError;
pub use frame::Frame;
pub use serial::{configure_port, list_ports, open_port, PortInfo};

/// Default baud rate of the sensor link.
pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// Largest deframed frame the pipeline accepts, in bytes.
pub const MAX_FRAME_SIZE: usize = 9000;

/// Smallest meaningful frame: TLV header plus trailing CRC.
pub const MIN_FRAME_SIZE: usize = crate::tlv::HEADER_LEN + 2;
