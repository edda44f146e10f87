//! Stream sinks
//!
//! Sinks terminate a pipeline: they consume decoded records and produce
//! human-facing output instead of a record stream.

mod csv;
mod display;

pub use csv::CsvSink;
pub use display::DisplaySink;

use std::io::{self, Read};

use crate::filter::FilterError;
use crate::tlv::Record;

/// A terminal consumer of a record stream.
pub trait RecordSink {
    /// Consume one record.
    fn consume(&mut self, record: &Record) -> io::Result<()>;

    /// Flush any buffered output at end-of-stream.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Feed a record stream into a sink until end-of-stream.
pub fn run_sink<R, S>(mut input: R, sink: &mut S) -> Result<(), FilterError>
where
    R: Read,
    S: RecordSink,
{
    while let Some(record) = crate::filter::next_record(&mut input)? {
        sink.consume(&record)?;
    }
    sink.finish()?;
    Ok(())
}
