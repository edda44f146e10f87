//! # GridWatch Core Library
//!
//! Core functionality for the GridWatch mains-frequency pipeline.
//!
//! This library provides:
//! - The sensor wire protocol: byte-stuffing deframer, CRC-16 frame gate
//!   and serial port handling
//! - The TLV record codec shared by all pipeline stages
//! - Stream filters (sample and 1PPS sanity checks, time-window extraction)
//!   and sinks (CSV conversion, live display)
//! - A simulated sensor for running the pipeline without hardware
//!
//! ## Example
//!
//! ```rust,ignore
//! use gridwatch_core::capture::Capture;
//! use gridwatch_core::protocol::{configure_port, open_port};
//!
//! let mut port = open_port("/dev/ttyACM0", 115200)?;
//! configure_port(port.as_mut())?;
//!
//! // Deframe, CRC-gate and stream records to stdout
//! Capture::new(port).run(std::io::stdout().lock())?;
//! ```

#![warn(missing_docs)]

pub mod capture;
pub mod clock;
pub mod demo;
pub mod filter;
pub mod protocol;
pub mod sink;
pub mod tlv;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::capture::Capture;
    pub use crate::clock::NOMINAL_CLOCK_HZ;
    pub use crate::filter::{
        run_filter, Flow, PulseCheckFilter, SampleCheckFilter, StreamFilter, TimeWindowFilter,
        WindowState,
    };
    pub use crate::protocol::{Deframer, Frame, ProtocolError};
    pub use crate::sink::{run_sink, CsvSink, DisplaySink, RecordSink};
    pub use crate::tlv::{read_record, write_record, Record, RecordError};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
