//! CSV conversion sink
//!
//! Renders each sample as one CSV row carrying the frequency under both the
//! nominal and the synchronized clock, the synchronized clock itself with
//! its ppm accuracy, and the last wallclock marker seen in the stream.

use std::io::{self, Write};

use chrono::DateTime;

use crate::clock::{deviation_ppm, mains_frequency, NOMINAL_CLOCK_HZ};
use crate::tlv::Record;

use super::RecordSink;

const HEADER: &str = "f_mains,f_mains_syncd,f_clk_syncd,clk_accuracy_ppm,t_wallclock,t_wallclock_str";

/// Record-to-CSV converter.
pub struct CsvSink<W: Write> {
    out: W,
    clock_hz: u32,
    wallclock_ns: u64,
}

impl<W: Write> CsvSink<W> {
    /// Create the sink and write the column header.
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "{}", HEADER)?;
        Ok(Self {
            out,
            clock_hz: NOMINAL_CLOCK_HZ,
            wallclock_ns: 0,
        })
    }

    fn write_samples(&mut self, samples: &[u32]) -> io::Result<()> {
        let seconds = (self.wallclock_ns / 1_000_000_000) as i64;
        let wallclock = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "timestamp out of range"))?;
        let timestr = wallclock.format("%Y-%m-%d %H:%M:%S");

        for &period in samples {
            writeln!(
                self.out,
                "{:.4},{:.4},{},{},{},{}",
                mains_frequency(NOMINAL_CLOCK_HZ, period),
                mains_frequency(self.clock_hz, period),
                self.clock_hz,
                deviation_ppm(self.clock_hz),
                self.wallclock_ns,
                timestr,
            )?;
        }
        Ok(())
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn consume(&mut self, record: &Record) -> io::Result<()> {
        match record {
            Record::Samples(samples) => self.write_samples(samples)?,
            Record::OnePulsePerSecond(clock_hz) => self.clock_hz = *clock_hz,
            Record::WallClockTime(nanos) => self.wallclock_ns = *nanos,
            Record::Unknown { .. } => {}
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
