//! Low-level NetCDF file layout.

use std::path::Path;

use cdi_calendar::TIME_UNITS;
use cdi_grid::MISSING;

use crate::error::IoError;
use crate::writer::SeriesWriter;

/// Writes the complete file described by `writer` to `path`.
///
/// Layout: dimensions `time`, `latitude`, `longitude`; CF coordinate
/// variables; one `f64` data variable per output with `units`, `long_name`
/// and `missing_value`; global `history`, `MAP_PROJECTION`, `DX`, `DY` and
/// `missing_value`.
pub(crate) fn write_file(path: &Path, writer: &SeriesWriter<'_>) -> Result<(), IoError> {
    let lat = writer.latitude();
    let lon = writer.longitude();
    let keys = writer.keys();
    let offsets: Vec<f64> = keys
        .iter()
        .map(|k| k.day_offset().map(|d| d as f64))
        .collect::<Result<_, _>>()?;

    let mut file = netcdf::create(path)?;

    file.add_dimension("time", keys.len())?;
    file.add_dimension("latitude", lat.len())?;
    file.add_dimension("longitude", lon.len())?;

    {
        let mut var = file.add_variable::<f64>("latitude", &["latitude"])?;
        var.put_attribute("units", "degrees_north")?;
        var.put_attribute("standard_name", "latitude")?;
        var.put_attribute("long_name", "latitude")?;
        var.put_values(&lat.values(), ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("longitude", &["longitude"])?;
        var.put_attribute("units", "degrees_east")?;
        var.put_attribute("standard_name", "longitude")?;
        var.put_attribute("long_name", "longitude")?;
        var.put_values(&lon.values(), ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("time", &["time"])?;
        var.put_attribute("units", TIME_UNITS)?;
        var.put_attribute("calendar", "proleptic_gregorian")?;
        var.put_attribute("standard_name", "time")?;
        var.put_values(&offsets, ..)?;
    }

    for output in writer.outputs() {
        let mut var = file.add_variable::<f64>(output.name(), &["time", "latitude", "longitude"])?;
        var.put_attribute("units", output.units())?;
        var.put_attribute("long_name", output.long_name())?;
        var.put_attribute("missing_value", MISSING)?;
        let data: Vec<f64> = output
            .series()
            .grids()
            .iter()
            .flat_map(|g| g.values().iter().copied())
            .collect();
        if !data.is_empty() {
            var.put_values(&data, ..)?;
        }
    }

    file.add_attribute("history", writer.history())?;
    file.add_attribute("MAP_PROJECTION", "EPSG:4326")?;
    file.add_attribute("DX", lon.spacing().abs())?;
    file.add_attribute("DY", lat.spacing().abs())?;
    file.add_attribute("missing_value", MISSING)?;

    // Dropping the handle flushes and closes the file.
    drop(file);
    Ok(())
}
