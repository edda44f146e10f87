//! 1PPS sanity filter
//!
//! A 1PPS calibration measurement far from the nominal sampling clock
//! frequency is a miscount, not a real drift; real crystals stay within a
//! few tens of ppm. Implausible measurements are dropped so they never
//! poison downstream clock state.

use crate::clock::deviation_ppm;
use crate::tlv::Record;

use super::{Flow, StreamFilter};

/// Plausibility check on 1PPS clock measurements.
pub struct PulseCheckFilter {
    max_deviation_ppm: u32,
}

impl PulseCheckFilter {
    /// Create a filter dropping measurements deviating more than
    /// `max_deviation_ppm` from the nominal clock frequency.
    pub fn new(max_deviation_ppm: u32) -> Self {
        Self { max_deviation_ppm }
    }
}

impl StreamFilter for PulseCheckFilter {
    fn process(&mut self, record: Record, out: &mut Vec<Record>) -> Flow {
        match record {
            Record::OnePulsePerSecond(clock_hz) => {
                let ppm = deviation_ppm(clock_hz);
                if ppm > self.max_deviation_ppm {
                    tracing::warn!(
                        clock_hz,
                        deviation_ppm = ppm,
                        "dropped 1PPS measurement exceeding maximum deviation"
                    );
                } else {
                    out.push(Record::OnePulsePerSecond(clock_hz));
                }
            }
            other => out.push(other),
        }
        Flow::Continue
    }
}
