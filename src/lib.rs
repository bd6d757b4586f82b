//! `axiwatch`
//!
//! A utility that watches an art project folder for incremental SVG plots and
//! sends them to an AxiDraw pen plotter.
//!
//! By convention an art project folder has a `files/` folder into which the
//! art process writes `increment.svg`. When that file appears it is handed to
//! the external plotter control program, the returned plot-progress document
//! is saved next to it as `increment.finished.svg`, the trigger file is
//! deleted and the watch resumes.

pub mod driver;
pub mod options;
pub mod svg;
pub mod watch;

pub use driver::{AxidrawCli, PlotError, PlotMode, Plotter};
pub use options::{load_project_options, DriverOptions, OptionsError};
pub use watch::{ProgressOutput, WatchConfig, WatchError};
