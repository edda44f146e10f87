//! `gridwatch demo` - simulated sensor wire stream

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use gridwatch_core::demo::SensorSimulator;

#[derive(Args)]
pub struct DemoArgs {
    /// Seconds of sensor output to generate
    #[arg(long, default_value_t = 10)]
    seconds: u32,

    /// Seed for a reproducible stream
    #[arg(long)]
    seed: Option<u64>,
}

pub fn run(args: DemoArgs) -> Result<()> {
    let mut simulator = match args.seed {
        Some(seed) => SensorSimulator::with_seed(seed),
        None => SensorSimulator::new(),
    };

    let mut out = std::io::stdout().lock();
    for _ in 0..args.seconds {
        out.write_all(&simulator.next_second())
            .context("could not write demo stream")?;
    }
    out.flush().context("could not write demo stream")?;
    Ok(())
}
