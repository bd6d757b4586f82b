//! `svg`
//!
//! Provides utilities for inspecting the trigger SVG before it is plotted.

use std::{io, path::Path};

/// The number of SVG units per mm. This is based on 96 SVG units per inch.
#[allow(clippy::excessive_precision)]
pub const SVG_UNITS_PER_MM: f32 = 3.779_527_559;

/// The substring that marks an SVG as carrying resumable plot state. The
/// driver embeds a `<plotdata>` element in the progress document it writes
/// after an interrupted plot.
pub const PLOT_DATA_MARKER: &str = "<plotdata";

/// A trigger file that has been loaded and is ready to plot.
pub struct Design {
    /// The SVG tree.
    pub tree: usvg::Tree,
    /// Width of the design in mm.
    pub width_mm: f32,
    /// Height of the design in mm.
    pub height_mm: f32,
    /// Whether the design carries resumable plot state.
    pub resumable: bool,
}

/// Errors that can occur when loading a trigger file.
#[derive(Debug)]
pub enum DesignError {
    /// The trigger file could not be read.
    FailedToRead(io::Error),
    /// There was an error while parsing the SVG file.
    ErrorParsingSvg(usvg::Error),
}

/// Checks whether SVG content carries resumable plot state.
///
/// # Arguments
/// * `contents`: The text of the SVG document.
///
/// # Returns
/// `true` if the document contains the plot-data marker.
pub fn has_plot_data(contents: &str) -> bool {
    contents.contains(PLOT_DATA_MARKER)
}

/// Parses an SVG file into a tree.
///
/// Increments are path-only documents, so no fonts or linked resources need
/// to be resolved.
///
/// # Arguments
/// * `bytes`: The bytes of the file.
///
/// # Returns
/// The parsed SVG if it was successfully parsed, otherwise an error.
///
/// # Errors
/// Parsing errors if a tree cannot be parsed from the provided `bytes`.
#[allow(clippy::module_name_repetitions)]
pub fn parse_svg(bytes: &[u8]) -> Result<usvg::Tree, usvg::Error> {
    let options = usvg::Options::default();
    usvg::Tree::from_data(bytes, &options)
}

/// Loads a trigger file from disk: parses the SVG, measures it and checks it
/// for resumable plot state.
///
/// # Arguments
/// * `path`: The path to the trigger file.
///
/// # Returns
/// The loaded [`Design`] if successful, otherwise a [`DesignError`].
///
/// # Errors
/// [`DesignError`] if the file cannot be read or is not a valid SVG.
pub fn load_design(path: &Path) -> Result<Design, DesignError> {
    let bytes = std::fs::read(path).map_err(DesignError::FailedToRead)?;
    let tree = parse_svg(&bytes).map_err(DesignError::ErrorParsingSvg)?;

    let size = tree.size();
    let resumable = has_plot_data(&String::from_utf8_lossy(&bytes));

    Ok(Design {
        tree,
        width_mm: size.width() / SVG_UNITS_PER_MM,
        height_mm: size.height() / SVG_UNITS_PER_MM,
        resumable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal A6-sized increment with a single stroked path.
    const FRESH_INCREMENT: &str = concat!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="105mm" height="148.5mm" "#,
        r#"viewBox="0 0 105 148.5">"#,
        r#"<path d="M 5 5 L 100 143.5" fill="none" stroke="black"/>"#,
        r#"</svg>"#
    );

    /// The same increment with the plot state the driver writes after an
    /// interrupted plot.
    const RESUMABLE_INCREMENT: &str = concat!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="105mm" height="148.5mm" "#,
        r#"viewBox="0 0 105 148.5">"#,
        r#"<plotdata layer="1" node="42"/>"#,
        r#"<path d="M 5 5 L 100 143.5" fill="none" stroke="black"/>"#,
        r#"</svg>"#
    );

    #[test]
    fn test_plot_data_marker_detection() {
        assert!(
            has_plot_data(RESUMABLE_INCREMENT),
            "document with a plotdata element should be detected"
        );
        assert!(
            !has_plot_data(FRESH_INCREMENT),
            "document without a plotdata element should not be detected"
        );
    }

    #[test]
    fn test_load_design_measures_in_mm() {
        let folder = tempfile::tempdir().expect("failed to create temp folder");
        let path = folder.path().join("increment.svg");
        std::fs::write(&path, FRESH_INCREMENT).expect("failed to write increment");

        let design = load_design(&path).expect("failed to load design");
        assert!(
            (design.width_mm - 105.0).abs() < 0.01,
            "width should be 105mm, got {}",
            design.width_mm
        );
        assert!(
            (design.height_mm - 148.5).abs() < 0.01,
            "height should be 148.5mm, got {}",
            design.height_mm
        );
        assert!(!design.resumable, "fresh increment should not be resumable");
    }

    #[test]
    fn test_load_design_detects_resumable_state() {
        let folder = tempfile::tempdir().expect("failed to create temp folder");
        let path = folder.path().join("increment.svg");
        std::fs::write(&path, RESUMABLE_INCREMENT).expect("failed to write increment");

        let design = load_design(&path).expect("failed to load design");
        assert!(design.resumable, "increment with plot state should resume");
    }

    #[test]
    fn test_load_design_rejects_non_svg() {
        let folder = tempfile::tempdir().expect("failed to create temp folder");
        let path = folder.path().join("increment.svg");
        std::fs::write(&path, "this is not an SVG").expect("failed to write file");

        let result = load_design(&path);
        assert!(
            matches!(result, Err(DesignError::ErrorParsingSvg(_))),
            "non-SVG content should fail to parse"
        );
    }

    #[test]
    fn test_load_design_missing_file() {
        let folder = tempfile::tempdir().expect("failed to create temp folder");
        let result = load_design(&folder.path().join("increment.svg"));
        assert!(
            matches!(result, Err(DesignError::FailedToRead(_))),
            "missing file should be a read error"
        );
    }
}
