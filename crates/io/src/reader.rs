//! High-level NetCDF grid-series reader.

use std::path::Path;

use cdi_grid::{Axis, Grid, IndicatorSeries, MISSING};
use tracing::{debug, info};

use crate::error::IoError;
use crate::netcdf_read;

// ---------------------------------------------------------------------------
// ReadRequest
// ---------------------------------------------------------------------------

/// What to read from a grid-series NetCDF file.
///
/// Use the builder methods (`with_*`) to customise coordinate aliases and
/// the time variable name. The defaults match the files this workspace
/// writes and the common CF spellings.
#[derive(Debug, Clone)]
pub struct ReadRequest {
    /// Data variable to read.
    variable: String,
    /// Aliases to try when looking up latitude coordinates.
    lat_aliases: Vec<String>,
    /// Aliases to try when looking up longitude coordinates.
    lon_aliases: Vec<String>,
    /// NetCDF variable name for the time axis.
    time_var: String,
}

impl ReadRequest {
    /// Reads `variable` with default coordinate names.
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            lat_aliases: vec!["latitude".into(), "lat".into(), "y".into()],
            lon_aliases: vec!["longitude".into(), "lon".into(), "x".into()],
            time_var: "time".into(),
        }
    }

    /// Set the latitude aliases, tried in order.
    pub fn with_lat_aliases<S: Into<String>>(mut self, aliases: impl IntoIterator<Item = S>) -> Self {
        self.lat_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Set the longitude aliases, tried in order.
    pub fn with_lon_aliases<S: Into<String>>(mut self, aliases: impl IntoIterator<Item = S>) -> Self {
        self.lon_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Set the time variable name.
    pub fn with_time_var(mut self, name: impl Into<String>) -> Self {
        self.time_var = name.into();
        self
    }

    /// Data variable name.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Validate that the request is usable.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidOutput`] if the variable name or an alias
    /// list is empty.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.variable.is_empty() {
            return Err(IoError::InvalidOutput {
                reason: "data variable name must not be empty".to_string(),
            });
        }
        if self.lat_aliases.is_empty() || self.lon_aliases.is_empty() {
            return Err(IoError::InvalidOutput {
                reason: "coordinate alias lists must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GridSeriesFile
// ---------------------------------------------------------------------------

/// One data variable of a grid-series file with its coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSeriesFile {
    latitude: Axis,
    longitude: Axis,
    units: Option<String>,
    long_name: Option<String>,
    series: IndicatorSeries,
}

impl GridSeriesFile {
    /// Latitude axis, in file order.
    pub fn latitude(&self) -> &Axis {
        &self.latitude
    }

    /// Longitude axis, in file order.
    pub fn longitude(&self) -> &Axis {
        &self.longitude
    }

    /// `units` attribute of the data variable.
    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// `long_name` attribute of the data variable.
    pub fn long_name(&self) -> Option<&str> {
        self.long_name.as_deref()
    }

    /// The grids keyed by month.
    pub fn series(&self) -> &IndicatorSeries {
        &self.series
    }

    /// Consumes the file, returning the series.
    pub fn into_series(self) -> IndicatorSeries {
        self.series
    }
}

// ---------------------------------------------------------------------------
// read_series
// ---------------------------------------------------------------------------

/// Read one data variable of a NetCDF file as a monthly grid series.
///
/// The variable may be 3-D `(time, lat, lon)` or 2-D `(lat, lon)`; a 2-D
/// variable is a single time step whose date comes from a one-element time
/// variable. Values equal to the variable's `missing_value` (or
/// `_FillValue`) and non-finite values become [`MISSING`].
///
/// # Errors
///
/// Returns [`IoError`] on missing variables or coordinates, dimension
/// mismatches, undecodable time values, or keys that are not strictly
/// increasing.
pub fn read_series(path: &Path, request: &ReadRequest) -> Result<GridSeriesFile, IoError> {
    request.validate()?;

    let file = netcdf_read::open_file(path)?;

    // -- Coordinates --------------------------------------------------------

    let lat_alias_refs: Vec<&str> = request.lat_aliases.iter().map(String::as_str).collect();
    let lon_alias_refs: Vec<&str> = request.lon_aliases.iter().map(String::as_str).collect();

    let (lat_name, lats) = netcdf_read::read_1d_f64(&file, &lat_alias_refs, path)?;
    let (lon_name, lons) = netcdf_read::read_1d_f64(&file, &lon_alias_refs, path)?;
    let latitude = coordinate_axis(&file, &lats, "DY", -1.0)?;
    let longitude = coordinate_axis(&file, &lons, "DX", 1.0)?;

    // -- Data ---------------------------------------------------------------

    let raw = netcdf_read::read_grid_variable(&file, &request.variable, path)?;
    if raw.ny != latitude.len() {
        return Err(IoError::DimensionMismatch {
            name: lat_name,
            expected: latitude.len(),
            got: raw.ny,
        });
    }
    if raw.nx != longitude.len() {
        return Err(IoError::DimensionMismatch {
            name: lon_name,
            expected: longitude.len(),
            got: raw.nx,
        });
    }

    // -- Time ---------------------------------------------------------------

    let (_, offsets) = netcdf_read::read_1d_f64(&file, &[&request.time_var], path)?;
    if offsets.len() != raw.nt {
        return Err(IoError::DimensionMismatch {
            name: request.time_var.clone(),
            expected: raw.nt,
            got: offsets.len(),
        });
    }
    let base_date = netcdf_read::read_time_units(&file, &request.time_var, path)?;
    let keys = netcdf_read::time_offsets_to_keys(base_date, &offsets)?;

    // -- Grids --------------------------------------------------------------

    let cells = raw.ny * raw.nx;
    let mut n_missing = 0usize;
    let grids = raw
        .data
        .chunks_exact(cells.max(1))
        .take(raw.nt)
        .map(|chunk| {
            let data: Vec<f64> = chunk
                .iter()
                .map(|&v| match raw.missing_value {
                    Some(mv) if netcdf_read::matches_missing(v, mv) => MISSING,
                    _ => v,
                })
                .collect();
            let grid = Grid::from_lossy(raw.ny, raw.nx, data)?;
            n_missing += grid.len() - grid.valid_count();
            Ok(grid)
        })
        .collect::<Result<Vec<_>, IoError>>()?;

    debug!(
        variable = %request.variable,
        missing_value = ?raw.missing_value,
        has_time = raw.has_time,
        n_missing,
        "decoded grids"
    );

    let series = IndicatorSeries::from_parts(keys, grids)?;
    info!(
        path = %path.display(),
        variable = %request.variable,
        times = series.len(),
        rows = raw.ny,
        cols = raw.nx,
        "read grid series"
    );

    Ok(GridSeriesFile {
        latitude,
        longitude,
        units: raw.units,
        long_name: raw.long_name,
        series,
    })
}

/// Axis from coordinate values. A single coordinate takes its spacing from
/// the global `DX`/`DY` attribute, laid out north-up and west-to-east.
fn coordinate_axis(
    file: &netcdf::File,
    values: &[f64],
    spacing_attr: &str,
    sign: f64,
) -> Result<Axis, IoError> {
    if let [only] = values
        && let Some(spacing) = file
            .attribute(spacing_attr)
            .and_then(|a| a.value().ok())
            .and_then(netcdf_read::attr_f64)
    {
        return Ok(Axis::new(*only, sign * spacing.abs(), 1)?);
    }
    Ok(Axis::from_values(values)?)
}
