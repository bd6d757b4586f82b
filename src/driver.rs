//! `driver`
//!
//! The seam between the watch loop and the external plotter control program.
//! The program owns motion planning and device communication; this module
//! only launches it and collects the plot-progress document it writes.

use std::{
    io,
    path::{Path, PathBuf},
    process::Command,
};

use serde_json::Value;

use crate::options::DriverOptions;

/// The name of the plotter control program, resolved through `PATH` unless
/// overridden on the command line.
pub const DEFAULT_DRIVER_PROGRAM: &str = "axicli";

/// The plot mode to run the driver in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotMode {
    /// Plot the design from the beginning.
    Plot,
    /// Resume a partial plot from the plot state embedded in the design.
    Resume,
}

impl PlotMode {
    /// Gets the value of the driver's `mode` option for this plot mode.
    ///
    /// # Returns
    /// The mode string the control program understands.
    pub fn option_value(&self) -> &'static str {
        match self {
            PlotMode::Plot => "plot",
            PlotMode::Resume => "res_plot",
        }
    }
}

/// Errors that can occur when plotting a design.
#[derive(Debug)]
pub enum PlotError {
    /// The plotter control program could not be launched.
    FailedToLaunchDriver(io::Error),
    /// The driver stopped the plot: the plotter disconnected, the pause
    /// button was pressed, or the design was rejected.
    DeviceError {
        /// The driver's exit code, if it exited normally.
        status: Option<i32>,
    },
    /// The plot-progress document the driver was asked to write could not be
    /// created or read back.
    FailedToReadProgress(io::Error),
}

/// A device that designs can be plotted on.
pub trait Plotter {
    /// Plots a design file, blocking until the physical plot has finished.
    ///
    /// # Arguments
    /// * `design`: Path to the SVG file to plot.
    /// * `mode`: Whether to start fresh or resume a partial plot.
    /// * `options`: Driver settings for this plot.
    ///
    /// # Returns
    /// The plot-progress SVG document if the plot finished, otherwise a
    /// [`PlotError`].
    ///
    /// # Errors
    /// [`PlotError`] if the plot could not be started or did not finish.
    fn plot(
        &mut self,
        design: &Path,
        mode: PlotMode,
        options: &DriverOptions,
    ) -> Result<String, PlotError>;
}

/// A [`Plotter`] that drives an AxiDraw through its command-line control
/// program. One value is created before the watch loop starts and owned by it
/// for the process lifetime.
pub struct AxidrawCli {
    /// The control program to launch for each plot.
    program: PathBuf,
}

impl AxidrawCli {
    /// Creates a driver session around a control program.
    ///
    /// # Arguments
    /// * `program`: The control program to launch, either a bare name looked
    ///   up on `PATH` or a path to the executable.
    ///
    /// # Returns
    /// A new [`AxidrawCli`].
    pub fn new(program: PathBuf) -> Self {
        AxidrawCli { program }
    }
}

/// Turns driver options into arguments of the control program. Boolean
/// options become bare flags when `true` and are omitted when `false`; all
/// other values are passed as `--key value`.
///
/// # Arguments
/// * `options`: The options to translate.
///
/// # Returns
/// The argument list, in option key order.
fn options_to_args(options: &DriverOptions) -> Vec<String> {
    let mut args = Vec::new();
    for (key, value) in options.iter() {
        match value {
            Value::Bool(true) => args.push(format!("--{key}")),
            Value::Bool(false) => {}
            Value::String(text) => {
                args.push(format!("--{key}"));
                args.push(text.clone());
            }
            other => {
                args.push(format!("--{key}"));
                args.push(other.to_string());
            }
        }
    }
    args
}

impl Plotter for AxidrawCli {
    fn plot(
        &mut self,
        design: &Path,
        mode: PlotMode,
        options: &DriverOptions,
    ) -> Result<String, PlotError> {
        // The driver re-serializes the design with embedded plot state; it is
        // round-tripped through a temporary file and returned to the caller.
        let progress_file = tempfile::Builder::new()
            .prefix("axiwatch-progress")
            .suffix(".svg")
            .tempfile()
            .map_err(PlotError::FailedToReadProgress)?;

        // The driver inherits stdout/stderr so its own progress reporting
        // stays visible on the console.
        let status = Command::new(&self.program)
            .arg(design)
            .arg("--mode")
            .arg(mode.option_value())
            .arg("--output_file")
            .arg(progress_file.path())
            .args(options_to_args(options))
            .status()
            .map_err(PlotError::FailedToLaunchDriver)?;

        if !status.success() {
            return Err(PlotError::DeviceError {
                status: status.code(),
            });
        }

        std::fs::read_to_string(progress_file.path()).map_err(PlotError::FailedToReadProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_mode_option_values() {
        assert_eq!(PlotMode::Plot.option_value(), "plot");
        assert_eq!(PlotMode::Resume.option_value(), "res_plot");
    }

    #[test]
    fn test_options_to_args_value_kinds() {
        let mut options = DriverOptions::new();
        options.set("speed_pendown", 25);
        options.set("const_speed", true);
        options.set("report_time", false);
        options.set("units", "mm");

        // BTreeMap iteration gives a stable key order.
        assert_eq!(
            options_to_args(&options),
            vec![
                "--const_speed".to_string(),
                "--speed_pendown".to_string(),
                "25".to_string(),
                "--units".to_string(),
                "mm".to_string(),
            ]
        );
    }

    #[test]
    fn test_options_to_args_empty() {
        assert!(
            options_to_args(&DriverOptions::new()).is_empty(),
            "no options should give no arguments"
        );
    }
}
