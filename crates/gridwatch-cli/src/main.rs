//! CLI for GridWatch
//!
//! One subcommand per pipeline stage. Stages read records on stdin and
//! write records on stdout, so a full pipeline is shell composition:
//!
//! ```text
//! gridwatch capture -d /dev/ttyACM0 \
//!     | gridwatch check-pulse -d 100 \
//!     | gridwatch check-samples -f 50.0 -d 2.0 \
//!     | gridwatch to-csv -o mains.csv
//! ```
//!
//! Diagnostics go to stderr via tracing; stdout carries only the record
//! stream (or the final human-facing output).

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "gridwatch")]
#[command(about = "Mains-frequency measurement pipeline", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read sensor frames from a serial port and emit records on stdout
    Capture(commands::capture::CaptureArgs),

    /// Drop samples outside the allowed mains-frequency band
    CheckSamples(commands::check::CheckSamplesArgs),

    /// Drop implausible 1PPS calibration measurements
    CheckPulse(commands::check::CheckPulseArgs),

    /// Pass through only the records inside a wallclock time window
    Window(commands::window::WindowArgs),

    /// Convert records to CSV rows
    ToCsv(commands::csv::ToCsvArgs),

    /// Show a live moving-average mains frequency
    Display,

    /// Write a simulated sensor wire stream to stdout
    Demo(commands::demo::DemoArgs),

    /// List candidate serial ports
    Ports,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Capture(args) => commands::capture::run(args),
        Commands::CheckSamples(args) => commands::check::run_samples(args),
        Commands::CheckPulse(args) => commands::check::run_pulse(args),
        Commands::Window(args) => commands::window::run(args),
        Commands::ToCsv(args) => commands::csv::run(args),
        Commands::Display => commands::display::run(),
        Commands::Demo(args) => commands::demo::run(args),
        Commands::Ports => commands::ports::run(),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
