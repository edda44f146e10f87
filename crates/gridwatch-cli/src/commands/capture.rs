//! `gridwatch capture` - serial channel to record stream

use anyhow::{Context, Result};
use clap::Args;

use gridwatch_core::capture::Capture;
use gridwatch_core::protocol::{configure_port, open_port, DEFAULT_BAUD_RATE};

#[derive(Args)]
pub struct CaptureArgs {
    /// Serial device the sensor is attached to, e.g. /dev/ttyACM0
    #[arg(short, long)]
    device: String,

    /// Baud rate of the sensor link
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,
}

pub fn run(args: CaptureArgs) -> Result<()> {
    let mut port = open_port(&args.device, args.baud)
        .with_context(|| format!("could not open serial device {}", args.device))?;
    configure_port(port.as_mut()).context("could not configure serial device")?;

    tracing::debug!(device = %args.device, baud = args.baud, "capture started");

    Capture::new(port)
        .run(std::io::stdout().lock())
        .context("capture failed")?;
    Ok(())
}
