//! `gridwatch check-samples` and `gridwatch check-pulse` - sanity filters

use anyhow::{Context, Result};
use clap::Args;

use gridwatch_core::filter::{run_filter, PulseCheckFilter, SampleCheckFilter};

#[derive(Args)]
pub struct CheckSamplesArgs {
    /// Nominal mains frequency in Hz
    #[arg(short = 'f', long)]
    nominal: f64,

    /// Maximum allowed deviation from the nominal frequency in Hz
    #[arg(short = 'd', long)]
    max_deviation: f64,
}

pub fn run_samples(args: CheckSamplesArgs) -> Result<()> {
    let mut filter = SampleCheckFilter::new(args.nominal, args.max_deviation);
    run_filter(
        std::io::stdin().lock(),
        std::io::stdout().lock(),
        &mut filter,
    )
    .context("sample check failed")?;
    Ok(())
}

#[derive(Args)]
pub struct CheckPulseArgs {
    /// Maximum allowed clock deviation from nominal in ppm
    #[arg(short = 'd', long)]
    max_deviation: u32,
}

pub fn run_pulse(args: CheckPulseArgs) -> Result<()> {
    let mut filter = PulseCheckFilter::new(args.max_deviation);
    run_filter(
        std::io::stdin().lock(),
        std::io::stdout().lock(),
        &mut filter,
    )
    .context("pulse check failed")?;
    Ok(())
}
