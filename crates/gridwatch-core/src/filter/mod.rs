//! Stream filter composition
//!
//! A filter is one sequential process: records in, records out, order
//! preserved. Filters implement [`StreamFilter`] and leave stream handling
//! to [`run_filter`], which reads until end-of-stream, a fatal fault, or
//! the filter asking to stop. Filters default to forwarding records they do
//! not recognize, so new record kinds pass through old pipeline stages.

mod pulse_check;
mod sample_check;
mod time_window;

pub use pulse_check::PulseCheckFilter;
pub use sample_check::SampleCheckFilter;
pub use time_window::{TimeWindowFilter, WindowState};

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::tlv::{read_record, write_record, Record, RecordError};

/// Fatal faults that end a filter process.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("malformed record stream: {0}")]
    Decode(#[from] RecordError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Whether the run loop should keep reading after a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Process the next record.
    Continue,
    /// Stop reading; the filter is done with the stream.
    Stop,
}

/// A pass-through record transformation.
pub trait StreamFilter {
    /// Transform one record, appending zero or more output records to
    /// `out` in the order they should appear downstream.
    fn process(&mut self, record: Record, out: &mut Vec<Record>) -> Flow;
}

/// Drive a filter over a record stream.
///
/// Reads records from `input` until end-of-stream, writes each batch of
/// outputs to `output` and flushes it, so a live consumer downstream sees
/// records as they happen. Record N+1 is never read before record N's
/// outputs are written.
pub fn run_filter<R, W, F>(mut input: R, mut output: W, filter: &mut F) -> Result<(), FilterError>
where
    R: Read,
    W: Write,
    F: StreamFilter,
{
    let mut out = Vec::new();
    while let Some(record) = next_record(&mut input)? {
        out.clear();
        let flow = filter.process(record, &mut out);
        for record in &out {
            write_record(&mut output, record)?;
        }
        output.flush()?;
        if flow == Flow::Stop {
            break;
        }
    }
    Ok(())
}

// Keeps transport faults and alignment-loss corruption apart in the error
// they surface as.
pub(crate) fn next_record<R: Read>(input: &mut R) -> Result<Option<Record>, FilterError> {
    read_record(input).map_err(|err| match err {
        RecordError::Io(io) => FilterError::Io(io),
        other => FilterError::Decode(other),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use super::*;

    // Runs a filter over in-memory streams and decodes what comes out.
    pub(crate) fn run_on_records<F: StreamFilter>(
        filter: &mut F,
        records: &[Record],
    ) -> Vec<Record> {
        let mut input = Vec::new();
        for record in records {
            write_record(&mut input, record).unwrap();
        }

        let mut output = Vec::new();
        run_filter(Cursor::new(input), &mut output, filter).unwrap();

        let mut cursor = Cursor::new(output);
        let mut decoded = Vec::new();
        while let Some(record) = read_record(&mut cursor).unwrap() {
            decoded.push(record);
        }
        decoded
    }

    struct Identity;

    impl StreamFilter for Identity {
        fn process(&mut self, record: Record, out: &mut Vec<Record>) -> Flow {
            out.push(record);
            Flow::Continue
        }
    }

    #[test]
    fn identity_filter_preserves_order() {
        let records = vec![
            Record::OnePulsePerSecond(42_000_000),
            Record::Samples(vec![840_000]),
            Record::WallClockTime(1),
            Record::Unknown {
                tag: 99,
                value: vec![0xAB],
            },
        ];
        assert_eq!(run_on_records(&mut Identity, &records), records);
    }

    struct StopAfterFirst;

    impl StreamFilter for StopAfterFirst {
        fn process(&mut self, record: Record, out: &mut Vec<Record>) -> Flow {
            out.push(record);
            Flow::Stop
        }
    }

    #[test]
    fn stop_ends_the_read_loop() {
        let records = vec![
            Record::WallClockTime(1),
            Record::WallClockTime(2),
            Record::WallClockTime(3),
        ];
        assert_eq!(
            run_on_records(&mut StopAfterFirst, &records),
            vec![Record::WallClockTime(1)]
        );
    }

    #[test]
    fn truncated_input_is_fatal() {
        let mut input = Record::OnePulsePerSecond(1).to_bytes();
        input.truncate(input.len() - 2);

        let result = run_filter(Cursor::new(input), Vec::new(), &mut Identity);
        assert!(matches!(
            result,
            Err(FilterError::Decode(RecordError::Truncated))
        ));
    }
}
