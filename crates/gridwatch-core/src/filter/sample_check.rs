//! Sample sanity filter
//!
//! Drops individual period counts whose implied mains frequency falls
//! outside the configured band around the nominal frequency. Keeps the
//! latest 1PPS clock estimate and applies it to every samples record that
//! follows.

use crate::clock::{mains_frequency, NOMINAL_CLOCK_HZ};
use crate::tlv::Record;

use super::{Flow, StreamFilter};

/// Per-sample plausibility check against a frequency band.
pub struct SampleCheckFilter {
    nominal_hz: f64,
    max_deviation_hz: f64,
    clock_hz: u32,
}

impl SampleCheckFilter {
    /// Create a filter accepting frequencies within
    /// `nominal_hz ± max_deviation_hz`, inclusive.
    pub fn new(nominal_hz: f64, max_deviation_hz: f64) -> Self {
        Self {
            nominal_hz,
            max_deviation_hz,
            clock_hz: NOMINAL_CLOCK_HZ,
        }
    }

    fn check_samples(&self, samples: Vec<u32>) -> Vec<u32> {
        samples
            .into_iter()
            .filter(|&period| {
                let f_mains = mains_frequency(self.clock_hz, period);
                let out_of_band = f_mains > self.nominal_hz + self.max_deviation_hz
                    || f_mains < self.nominal_hz - self.max_deviation_hz;
                if out_of_band {
                    tracing::warn!(
                        f_mains,
                        f_clock = self.clock_hz,
                        "dropped sample exceeding maximum deviation"
                    );
                }
                !out_of_band
            })
            .collect()
    }
}

impl StreamFilter for SampleCheckFilter {
    fn process(&mut self, record: Record, out: &mut Vec<Record>) -> Flow {
        match record {
            Record::Samples(samples) => {
                out.push(Record::Samples(self.check_samples(samples)));
            }
            Record::OnePulsePerSecond(clock_hz) => {
                self.clock_hz = clock_hz;
                out.push(Record::OnePulsePerSecond(clock_hz));
            }
            other => out.push(other),
        }
        Flow::Continue
    }
}
