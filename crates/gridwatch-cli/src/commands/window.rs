//! `gridwatch window` - time-window extraction

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::Args;

use gridwatch_core::filter::{run_filter, TimeWindowFilter};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Args)]
pub struct WindowArgs {
    /// Include everything at or after this time, e.g. "2026-08-01 12:00:00"
    #[arg(short, long)]
    start: String,

    /// Include everything at or before this time
    #[arg(short, long)]
    end: String,

    /// Interpret the times as local time instead of UTC
    #[arg(short, long)]
    local: bool,
}

pub fn run(args: WindowArgs) -> Result<()> {
    let start_ns = parse_bound(&args.start, args.local)
        .with_context(|| format!("could not parse start time '{}'", args.start))?;
    let end_ns = parse_bound(&args.end, args.local)
        .with_context(|| format!("could not parse end time '{}'", args.end))?;
    if end_ns < start_ns {
        bail!("end time lies before start time");
    }

    let mut filter = TimeWindowFilter::new(start_ns, end_ns);
    run_filter(
        std::io::stdin().lock(),
        std::io::stdout().lock(),
        &mut filter,
    )
    .context("time-window filter failed")?;
    Ok(())
}

// Parse a window bound to nanoseconds since the Unix epoch.
fn parse_bound(text: &str, local: bool) -> Result<u64> {
    let naive = NaiveDateTime::parse_from_str(text, TIME_FORMAT)?;
    let nanos = if local {
        naive
            .and_local_timezone(Local)
            .single()
            .context("ambiguous or nonexistent local time")?
            .timestamp_nanos_opt()
            .context("time out of range")?
    } else {
        naive
            .and_utc()
            .timestamp_nanos_opt()
            .context("time out of range")?
    };
    u64::try_from(nanos).context("time lies before the Unix epoch")
}
