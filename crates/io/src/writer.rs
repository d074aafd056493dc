//! High-level NetCDF writer configuration and atomic output.

use std::fs;
use std::path::{Path, PathBuf};

use cdi_calendar::CalendarKey;
use cdi_grid::{Axis, IndicatorSeries};
use tracing::{debug, info, warn};

use crate::error::IoError;
use crate::netcdf_write;

/// Suffix of the sibling file written before the final rename.
pub const PARTIAL_SUFFIX: &str = "partial";

/// One data variable of an output file.
#[derive(Debug, Clone)]
pub struct OutputVariable<'a> {
    name: String,
    units: String,
    long_name: String,
    series: &'a IndicatorSeries,
}

impl<'a> OutputVariable<'a> {
    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `units` attribute.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// `long_name` attribute.
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// The grids to write.
    pub fn series(&self) -> &'a IndicatorSeries {
        self.series
    }
}

/// Describes a grid-series file: coordinates, data variables and history.
///
/// All variables share the time axis of the first one and must match the
/// coordinate lengths.
#[derive(Debug, Clone)]
pub struct SeriesWriter<'a> {
    latitude: Axis,
    longitude: Axis,
    outputs: Vec<OutputVariable<'a>>,
    history: String,
}

impl<'a> SeriesWriter<'a> {
    /// Starts a file on the given coordinates.
    pub fn new(latitude: Axis, longitude: Axis) -> Self {
        Self {
            latitude,
            longitude,
            outputs: Vec::new(),
            history: String::new(),
        }
    }

    /// Adds a data variable.
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        units: impl Into<String>,
        long_name: impl Into<String>,
        series: &'a IndicatorSeries,
    ) -> Self {
        self.outputs.push(OutputVariable {
            name: name.into(),
            units: units.into(),
            long_name: long_name.into(),
            series,
        });
        self
    }

    /// Sets the global `history` attribute.
    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.history = history.into();
        self
    }

    /// Latitude axis.
    pub fn latitude(&self) -> &Axis {
        &self.latitude
    }

    /// Longitude axis.
    pub fn longitude(&self) -> &Axis {
        &self.longitude
    }

    /// Data variables in insertion order.
    pub fn outputs(&self) -> &[OutputVariable<'a>] {
        &self.outputs
    }

    /// Global `history` attribute.
    pub fn history(&self) -> &str {
        &self.history
    }

    /// Shared time keys.
    pub fn keys(&self) -> &[CalendarKey] {
        match self.outputs.first() {
            Some(o) => o.series.keys(),
            None => &[],
        }
    }

    /// Validates that the variables fit the coordinates and each other.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidOutput`] if there is no variable, a name is
    /// empty, reserved or duplicated, or the time keys differ, and
    /// [`IoError::DimensionMismatch`] if a grid does not match the axes.
    pub fn validate(&self) -> Result<(), IoError> {
        let Some(first) = self.outputs.first() else {
            return Err(IoError::InvalidOutput {
                reason: "no data variable to write".to_string(),
            });
        };
        for (i, output) in self.outputs.iter().enumerate() {
            if output.name.is_empty() {
                return Err(IoError::InvalidOutput {
                    reason: "data variable name must not be empty".to_string(),
                });
            }
            if ["time", "latitude", "longitude"].contains(&output.name.as_str()) {
                return Err(IoError::InvalidOutput {
                    reason: format!("'{}' is a coordinate variable name", output.name),
                });
            }
            if self.outputs[..i].iter().any(|o| o.name == output.name) {
                return Err(IoError::InvalidOutput {
                    reason: format!("duplicate data variable '{}'", output.name),
                });
            }
            if output.series.keys() != first.series.keys() {
                return Err(IoError::InvalidOutput {
                    reason: format!(
                        "variable '{}' has different time steps from '{}'",
                        output.name, first.name
                    ),
                });
            }
            if let Some((rows, cols)) = output.series.shape() {
                if rows != self.latitude.len() {
                    return Err(IoError::DimensionMismatch {
                        name: "latitude".to_string(),
                        expected: self.latitude.len(),
                        got: rows,
                    });
                }
                if cols != self.longitude.len() {
                    return Err(IoError::DimensionMismatch {
                        name: "longitude".to_string(),
                        expected: self.longitude.len(),
                        got: cols,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Sibling path the data is written to before it replaces `path`.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    path.with_file_name(name)
}

/// Write a grid-series file atomically.
///
/// The file is written to [`partial_path`], reopened to confirm it is
/// readable, and only then renamed over `path`. On failure the partial file
/// is removed and any existing file at `path` is left untouched.
///
/// # Errors
///
/// Returns [`IoError`] if validation fails, the NetCDF library reports an
/// error, or the rename fails.
pub fn write_series(path: &Path, writer: &SeriesWriter<'_>) -> Result<(), IoError> {
    writer.validate()?;

    let partial = partial_path(path);
    if partial.exists() {
        debug!(path = %partial.display(), "removing stale partial file");
        remove(&partial)?;
    }

    if let Err(e) = write_and_check(&partial, writer) {
        if partial.exists()
            && let Err(cleanup) = fs::remove_file(&partial)
        {
            warn!(path = %partial.display(), error = %cleanup, "could not remove partial file");
        }
        return Err(e);
    }

    fs::rename(&partial, path).map_err(|source| IoError::FileSystem {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        variables = writer.outputs().len(),
        times = writer.keys().len(),
        "wrote grid series"
    );
    Ok(())
}

fn write_and_check(partial: &Path, writer: &SeriesWriter<'_>) -> Result<(), IoError> {
    netcdf_write::write_file(partial, writer)?;
    let file = netcdf::open(partial)?;
    let times = file.dimension("time").map_or(0, |d| d.len());
    if times != writer.keys().len() {
        return Err(IoError::DimensionMismatch {
            name: "time".to_string(),
            expected: writer.keys().len(),
            got: times,
        });
    }
    Ok(())
}

fn remove(path: &Path) -> Result<(), IoError> {
    fs::remove_file(path).map_err(|source| IoError::FileSystem {
        path: path.to_path_buf(),
        source,
    })
}
