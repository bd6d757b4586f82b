//! `axiwatch`
//!
//! Watches an art project folder for `files/increment.svg` and plots each
//! increment on an AxiDraw as it appears.

use std::{path::PathBuf, time::Duration};

use axiwatch::{
    driver::DEFAULT_DRIVER_PROGRAM,
    watch::{self, ProgressOutput, WatchConfig},
    AxidrawCli,
};
use clap::Parser;

/// Command-line arguments.
#[derive(Parser)]
#[command(version, about = "Watches an art project folder and plots incremental SVGs on an AxiDraw")]
struct Args {
    /// The art project folder to watch. By convention it has a files/ folder
    /// that increments are written into, and optionally an
    /// axidraw_options.json with driver defaults.
    folder: PathBuf,

    /// The plotter control program to drive.
    #[arg(long, default_value = DEFAULT_DRIVER_PROGRAM)]
    driver: PathBuf,

    /// Discard the plot-progress document instead of saving it to
    /// files/increment.finished.svg.
    #[arg(long)]
    discard_finished: bool,

    /// How often to check for the trigger file, in milliseconds.
    #[arg(long, default_value_t = 100)]
    poll_interval_ms: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut plotter = AxidrawCli::new(args.driver);
    let config = WatchConfig {
        poll_interval: Duration::from_millis(args.poll_interval_ms),
        progress: if args.discard_finished {
            ProgressOutput::Discard
        } else {
            ProgressOutput::Keep
        },
    };

    if let Err(err) = watch::run(&args.folder, &mut plotter, &config) {
        log::error!("watch loop stopped: {err:?}");
        std::process::exit(1);
    }
}
