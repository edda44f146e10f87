//! `gridwatch to-csv` - record stream to CSV rows

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use gridwatch_core::sink::{run_sink, CsvSink};

#[derive(Args)]
pub struct ToCsvArgs {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ToCsvArgs) -> Result<()> {
    let out: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout().lock()),
    };

    let mut sink = CsvSink::new(out).context("could not write CSV header")?;
    run_sink(std::io::stdin().lock(), &mut sink).context("CSV conversion failed")?;
    Ok(())
}
