//! Demo mode - simulated sensor wire stream
//!
//! Generates the byte stream a real sensor would put on the serial link, so
//! the whole pipeline can be exercised without hardware: period counts
//! jittered around a 50 Hz mains, a slowly drifting sampling clock and a
//! 1PPS calibration frame at the start of every simulated second.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::NOMINAL_CLOCK_HZ;
use crate::protocol::Frame;
use crate::tlv::Record;

// Mains cycles per simulated second at 50 Hz nominal.
const SAMPLES_PER_SECOND: usize = 50;

/// Simulated mains-frequency sensor.
pub struct SensorSimulator {
    rng: StdRng,
    clock_hz: u32,
}

impl SensorSimulator {
    /// Simulator with operating-system entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic simulator for tests and reproducible demo runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            clock_hz: NOMINAL_CLOCK_HZ,
        }
    }

    /// One second of sensor output as wire bytes: a 1PPS calibration frame
    /// followed by a batch of period counts.
    pub fn next_second(&mut self) -> Vec<u8> {
        // Crystal wander, a few ppm per step, bounded to +/-50 ppm
        let step = self.rng.gen_range(-3.0..3.0) * 1.0e-6 * NOMINAL_CLOCK_HZ as f64;
        let min = (NOMINAL_CLOCK_HZ as f64 * (1.0 - 50.0e-6)) as u32;
        let max = (NOMINAL_CLOCK_HZ as f64 * (1.0 + 50.0e-6)) as u32;
        self.clock_hz = ((self.clock_hz as f64 + step) as u32).clamp(min, max);

        let samples: Vec<u32> = (0..SAMPLES_PER_SECOND)
            .map(|_| {
                let f_mains = 50.0 + self.rng.gen_range(-0.05..0.05);
                (self.clock_hz as f64 / f_mains) as u32
            })
            .collect();

        let mut wire = Vec::new();
        wire.extend(frame_bytes(&Record::OnePulsePerSecond(self.clock_hz)));
        wire.extend(frame_bytes(&Record::Samples(samples)));
        wire
    }
}

impl Default for SensorSimulator {
    fn default() -> Self {
        Self::new()
    }
}

fn frame_bytes(record: &Record) -> Vec<u8> {
    Frame::new(record.to_bytes()).to_wire()
}
