//! Moving-average display sink
//!
//! Averages the mains frequency over a fixed window of samples and prints a
//! line whenever the window fills, plus one on every clock recalibration.

use std::io::{self, Write};

use crate::clock::{mains_frequency, NOMINAL_CLOCK_HZ};
use crate::tlv::Record;

use super::RecordSink;

/// Samples per printed average.
pub const WINDOW_LEN: usize = 50;

/// Live terminal view of the stream.
pub struct DisplaySink<W: Write> {
    out: W,
    clock_hz: u32,
    window_sum: f64,
    window_count: usize,
    average_hz: f64,
}

impl<W: Write> DisplaySink<W> {
    /// Create a display writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            clock_hz: NOMINAL_CLOCK_HZ,
            window_sum: 0.0,
            window_count: 0,
            average_hz: 0.0,
        }
    }

    fn print(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "f_mains = {:8.4} Hz   (f_clk = {} Hz)",
            self.average_hz, self.clock_hz
        )?;
        self.out.flush()
    }
}

impl<W: Write> RecordSink for DisplaySink<W> {
    fn consume(&mut self, record: &Record) -> io::Result<()> {
        match record {
            Record::Samples(samples) => {
                for &period in samples {
                    self.window_sum += mains_frequency(self.clock_hz, period);
                    self.window_count += 1;
                    if self.window_count == WINDOW_LEN {
                        self.average_hz = self.window_sum / WINDOW_LEN as f64;
                        self.window_sum = 0.0;
                        self.window_count = 0;
                        self.print()?;
                    }
                }
            }
            Record::OnePulsePerSecond(clock_hz) => {
                self.clock_hz = *clock_hz;
                self.print()?;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_once_per_full_window() {
        let mut out = Vec::new();
        let mut sink = DisplaySink::new(&mut out);

        // 49 samples: window not full, nothing printed
        sink.consume(&Record::Samples(vec![840_000; WINDOW_LEN - 1]))
            .unwrap();
        assert!(out.is_empty());

        // The 50th sample completes the window
        let mut sink = DisplaySink::new(&mut out);
        sink.consume(&Record::Samples(vec![840_000; WINDOW_LEN]))
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("50.0000"));
    }

    #[test]
    fn window_spans_sample_records() {
        let mut out = Vec::new();
        let mut sink = DisplaySink::new(&mut out);
        sink.consume(&Record::Samples(vec![840_000; 30])).unwrap();
        sink.consume(&Record::Samples(vec![840_000; 30])).unwrap();
        // 60 samples: one full window, 10 carried into the next
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn clock_update_prints_immediately() {
        let mut out = Vec::new();
        let mut sink = DisplaySink::new(&mut out);
        sink.consume(&Record::OnePulsePerSecond(NOMINAL_CLOCK_HZ + 100))
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(&(NOMINAL_CLOCK_HZ + 100).to_string()));
    }
}
