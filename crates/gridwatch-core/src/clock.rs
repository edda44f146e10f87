//! Sampling-clock bookkeeping shared by filters and sinks.
//!
//! The sensor counts periods of its sampling clock between mains zero
//! crossings. Every frequency the pipeline reports is derived from the
//! current estimate of that clock frequency, which the 1PPS calibration
//! records keep honest.

/// Nominal sampling clock frequency in Hz.
///
/// The sensor samples at half its 84 MHz master clock.
pub const NOMINAL_CLOCK_HZ: u32 = 84_000_000 / 2;

/// Mains frequency implied by a period count at the given clock frequency.
pub fn mains_frequency(clock_hz: u32, period_count: u32) -> f64 {
    clock_hz as f64 / period_count as f64
}

/// Deviation of a measured clock frequency from [`NOMINAL_CLOCK_HZ`] in
/// whole ppm, rounded half-up.
pub fn deviation_ppm(clock_hz: u32) -> u32 {
    let ratio = clock_hz as f64 / NOMINAL_CLOCK_HZ as f64;
    let deviation = if ratio > 1.0 { ratio - 1.0 } else { 1.0 - ratio };
    (1.0e6 * deviation + 0.5) as u32
}
