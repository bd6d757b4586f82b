//! `watch`
//!
//! The watch-plot loop: blocks until the trigger file appears, plots it,
//! saves the plot-progress document, deletes the trigger and goes back to
//! watching.

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    driver::{PlotError, PlotMode, Plotter},
    options::{load_project_options, DriverOptions, OptionsError},
    svg::{load_design, DesignError},
};

/// The trigger file, relative to the watched folder. Its appearance means
/// "plot this now".
pub const TRIGGER_FILE: &str = "files/increment.svg";
/// Where the plot-progress document is saved, relative to the watched folder.
/// The art process reads it back to carry plot state into the next increment.
pub const FINISHED_FILE: &str = "files/increment.finished.svg";

/// How long to sleep between checks for the trigger file.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What to do with the plot-progress document the driver returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutput {
    /// Save it to [`FINISHED_FILE`] before the trigger is deleted.
    Keep,
    /// Throw it away.
    Discard,
}

/// Settings of the watch-plot loop.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// How long to sleep between checks for the trigger file.
    pub poll_interval: Duration,
    /// What to do with the plot-progress document.
    pub progress: ProgressOutput,
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            poll_interval: DEFAULT_POLL_INTERVAL,
            progress: ProgressOutput::Keep,
        }
    }
}

/// Errors that stop the watch-plot loop. There is no retry: a stopped loop
/// means a stopped process, and the operator restarts it once the plotter is
/// back in a known state.
#[derive(Debug)]
pub enum WatchError {
    /// The given working folder does not exist or is not a folder.
    NotAFolder(PathBuf),
    /// The per-project options file could not be loaded.
    Options(OptionsError),
    /// The trigger file could not be loaded.
    Design(DesignError),
    /// The driver failed or stopped the plot.
    Plot(PlotError),
    /// The plot-progress document could not be saved.
    FailedToWriteProgress(io::Error),
    /// The trigger file could not be deleted after plotting.
    FailedToRemoveTrigger(io::Error),
}

/// Blocks until a file exists, checking at a fixed interval. Returns
/// immediately when the file is already there.
///
/// # Arguments
/// * `path`: The file to wait for.
/// * `interval`: How long to sleep between checks.
pub fn wait_for_file(path: &Path, interval: Duration) {
    while !path.is_file() {
        std::thread::sleep(interval);
    }
}

/// Runs the watch-plot loop forever: validates the folder, loads the
/// project's driver defaults once, then plots every trigger file that
/// appears.
///
/// # Arguments
/// * `folder`: The art project folder to watch.
/// * `plotter`: The driver session, owned by the loop from here on.
/// * `config`: Loop settings.
///
/// # Returns
/// Only ever an error: either the folder or its options are unusable, or a
/// plot failed.
///
/// # Errors
/// [`WatchError`] describing why the loop stopped.
pub fn run<P: Plotter>(
    folder: &Path,
    plotter: &mut P,
    config: &WatchConfig,
) -> Result<(), WatchError> {
    let folder = folder
        .canonicalize()
        .map_err(|_| WatchError::NotAFolder(folder.to_path_buf()))?;
    if !folder.is_dir() {
        return Err(WatchError::NotAFolder(folder));
    }

    log::info!("sourcing project options in {}", folder.display());
    let defaults = load_project_options(&folder).map_err(WatchError::Options)?;

    loop {
        plot_next(&folder, plotter, &defaults, config)?;
    }
}

/// Runs one watch-plot cycle: blocks until the trigger file appears, plots
/// it, saves the plot-progress document and deletes the trigger.
///
/// # Arguments
/// * `folder`: The art project folder being watched.
/// * `plotter`: The driver session.
/// * `defaults`: The project's driver defaults, applied before every plot.
/// * `config`: Loop settings.
///
/// # Returns
/// `Ok(())` once the cycle has completed, otherwise the [`WatchError`] that
/// stops the loop.
///
/// # Errors
/// [`WatchError`] if the trigger cannot be loaded, the plot fails, or the
/// result files cannot be written or removed.
pub fn plot_next<P: Plotter>(
    folder: &Path,
    plotter: &mut P,
    defaults: &DriverOptions,
    config: &WatchConfig,
) -> Result<(), WatchError> {
    let trigger = folder.join(TRIGGER_FILE);

    log::info!("waiting for {}", trigger.display());
    wait_for_file(&trigger, config.poll_interval);

    let design = load_design(&trigger).map_err(WatchError::Design)?;
    let mode = if design.resumable {
        PlotMode::Resume
    } else {
        PlotMode::Plot
    };

    let mut options = defaults.clone();
    options.force_safety();

    log::info!(
        "plotting {} ({:.1}mm x {:.1}mm, mode {})",
        trigger.display(),
        design.width_mm,
        design.height_mm,
        mode.option_value()
    );

    // Blocks for the physical duration of the plot, seconds to hours.
    let progress = plotter
        .plot(&trigger, mode, &options)
        .map_err(WatchError::Plot)?;

    // The progress document must be on disk before the trigger disappears,
    // otherwise the art process can start the next increment from stale
    // state.
    if config.progress == ProgressOutput::Keep {
        let finished = folder.join(FINISHED_FILE);
        std::fs::write(&finished, progress).map_err(WatchError::FailedToWriteProgress)?;
        log::info!("saved plot progress to {}", finished.display());
    }

    std::fs::remove_file(&trigger).map_err(WatchError::FailedToRemoveTrigger)?;

    Ok(())
}
