//! `gridwatch display` - live moving-average frequency view

use anyhow::{Context, Result};

use gridwatch_core::sink::{run_sink, DisplaySink};

pub fn run() -> Result<()> {
    let mut sink = DisplaySink::new(std::io::stdout().lock());
    run_sink(std::io::stdin().lock(), &mut sink).context("display failed")?;
    Ok(())
}
