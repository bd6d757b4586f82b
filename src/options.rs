//! `options`
//!
//! Driver settings and the per-project options file that seeds them.

use std::{collections::BTreeMap, io, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The name of the per-project options file, looked up inside the watched
/// folder. Each entry is an option of the plotter control program.
pub const PROJECT_OPTIONS_FILE: &str = "axidraw_options.json";

/// Option that makes the driver abort the plot when the plotter disconnects.
pub const ABORT_ON_DISCONNECT_OPTION: &str = "abort_on_disconnect";
/// Option that makes the driver abort the plot when the physical pause button
/// is pressed.
pub const ABORT_ON_PAUSE_OPTION: &str = "abort_on_pause";

/// Settings applied to the plotter driver for a single plot, keyed by the
/// option names of the control program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverOptions(BTreeMap<String, Value>);

impl DriverOptions {
    /// Creates an empty set of driver options.
    ///
    /// # Returns
    /// A [`DriverOptions`] with no options set.
    pub fn new() -> Self {
        DriverOptions(BTreeMap::new())
    }

    /// Sets an option, replacing any previous value for the same key.
    ///
    /// # Arguments
    /// * `key`: The option name, as understood by the control program.
    /// * `value`: The value to set the option to.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Gets the value of an option.
    ///
    /// # Arguments
    /// * `key`: The option name.
    ///
    /// # Returns
    /// The value of the option, if it has been set.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterates over the options in key order.
    ///
    /// # Returns
    /// An iterator of `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Whether no options are set.
    ///
    /// # Returns
    /// `true` if the option set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Forces the safety options on, overriding any project-supplied values.
    /// The whole process must stop when the plotter disconnects or is paused,
    /// so these are never left to the project.
    pub fn force_safety(&mut self) {
        self.set(ABORT_ON_DISCONNECT_OPTION, true);
        self.set(ABORT_ON_PAUSE_OPTION, true);
    }
}

/// Errors that can occur when loading the per-project options file.
#[derive(Debug)]
pub enum OptionsError {
    /// The options file exists but could not be read.
    FailedToRead(io::Error),
    /// The options file is not a valid JSON object of option values.
    FailedToParse(serde_json::Error),
}

/// Loads the per-project driver defaults from [`PROJECT_OPTIONS_FILE`] inside
/// the watched folder. A project without an options file gets empty defaults.
///
/// # Arguments
/// * `folder`: The watched art project folder.
///
/// # Returns
/// The project's driver defaults if they could be loaded, otherwise an
/// [`OptionsError`].
///
/// # Errors
/// [`OptionsError`] if the options file exists but cannot be read or parsed.
pub fn load_project_options(folder: &Path) -> Result<DriverOptions, OptionsError> {
    let path = folder.join(PROJECT_OPTIONS_FILE);
    if !path.is_file() {
        return Ok(DriverOptions::new());
    }

    let bytes = std::fs::read(&path).map_err(OptionsError::FailedToRead)?;
    serde_json::from_slice(&bytes).map_err(OptionsError::FailedToParse)
}
