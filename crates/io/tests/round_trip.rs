//! Integration tests: write grid series to NetCDF and read them back.

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use cdi_calendar::{CalendarKey, monthly_sequence};
use cdi_grid::{Axis, Grid, IndicatorSeries, MISSING};
use cdi_io::{IoError, ReadRequest, SeriesWriter, partial_path, read_series, write_series};
use netcdf::AttributeValue;
use tempfile::tempdir;

fn region_axes() -> (Axis, Axis) {
    (
        Axis::new(-25.725, -0.05, 3).unwrap(),
        Axis::new(30.775, 0.05, 4).unwrap(),
    )
}

fn ramp_series(start: CalendarKey, months: usize, offset: f64) -> IndicatorSeries {
    let keys = monthly_sequence(start, months);
    let grids = (0..months)
        .map(|t| {
            let mut data: Vec<f64> = (0..12).map(|c| offset + t as f64 + 0.01 * c as f64).collect();
            data[5] = MISSING;
            Grid::new(3, 4, data).unwrap()
        })
        .collect();
    IndicatorSeries::from_parts(keys, grids).unwrap()
}

#[test]
fn write_then_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lst_anom.nc");
    let (lat, lon) = region_axes();
    let series = ramp_series(CalendarKey::new(2003, 11).unwrap(), 4, 0.0);

    let writer = SeriesWriter::new(lat, lon)
        .with_variable("lst_anom", "K", "LST anomaly", &series)
        .with_history("test");
    write_series(&path, &writer).unwrap();
    assert!(path.exists());
    assert!(!partial_path(&path).exists());

    let file = read_series(&path, &ReadRequest::new("lst_anom")).unwrap();
    assert_eq!(file.series(), &series);
    assert_eq!(file.units(), Some("K"));
    assert_eq!(file.long_name(), Some("LST anomaly"));
    assert_eq!(file.latitude().len(), 3);
    assert!(!file.latitude().is_ascending());
    assert_relative_eq!(file.latitude().origin(), -25.725, epsilon = 1e-9);
    assert_relative_eq!(file.longitude().spacing(), 0.05, epsilon = 1e-9);
}

#[test]
fn global_attributes_and_time_units() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cdi.nc");
    let (lat, lon) = region_axes();
    let series = ramp_series(CalendarKey::new(2000, 1).unwrap(), 2, 0.0);
    let writer = SeriesWriter::new(lat, lon)
        .with_variable("cdi", "1", "Weighted Composite Drought Indicator", &series)
        .with_history("cdi composite");
    write_series(&path, &writer).unwrap();

    let file = netcdf::open(&path).unwrap();
    let attr = |name: &str| file.attribute(name).unwrap().value().unwrap();
    assert_eq!(attr("MAP_PROJECTION"), AttributeValue::Str("EPSG:4326".into()));
    assert_eq!(attr("history"), AttributeValue::Str("cdi composite".into()));
    assert_eq!(attr("missing_value"), AttributeValue::Double(MISSING));
    match attr("DX") {
        AttributeValue::Double(dx) => assert_relative_eq!(dx, 0.05, epsilon = 1e-12),
        other => panic!("unexpected DX {other:?}"),
    }

    let time = file.variable("time").unwrap();
    let offsets = time.get_values::<f64, _>(..).unwrap();
    assert_eq!(offsets, vec![36524.0, 36555.0]);
    assert_eq!(
        time.attribute_value("calendar").unwrap().unwrap(),
        AttributeValue::Str("proleptic_gregorian".into())
    );
}

#[test]
fn multiple_variables_share_time() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spi.nc");
    let (lat, lon) = region_axes();
    let start = CalendarKey::new(1981, 1).unwrap();
    let spi1 = ramp_series(start, 3, 0.0);
    let spi3 = ramp_series(start, 3, 10.0);
    let writer = SeriesWriter::new(lat, lon)
        .with_variable("spi_1_anom", "none", "SPI anomaly (1 month)", &spi1)
        .with_variable("spi_3_anom", "none", "SPI anomaly (3 month)", &spi3);
    write_series(&path, &writer).unwrap();

    let back = read_series(&path, &ReadRequest::new("spi_3_anom")).unwrap();
    assert_eq!(back.series(), &spi3);
}

#[test]
fn overwrite_replaces_previous_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.nc");
    let (lat, lon) = region_axes();
    let first = ramp_series(CalendarKey::new(2001, 1).unwrap(), 2, 0.0);
    let second = ramp_series(CalendarKey::new(2001, 1).unwrap(), 3, 5.0);

    write_series(&path, &SeriesWriter::new(lat, lon).with_variable("v", "1", "v", &first)).unwrap();
    write_series(&path, &SeriesWriter::new(lat, lon).with_variable("v", "1", "v", &second)).unwrap();

    let back = read_series(&path, &ReadRequest::new("v")).unwrap();
    assert_eq!(back.series(), &second);
}

#[test]
fn failed_write_leaves_nothing_behind() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("out.nc");
    let (lat, lon) = region_axes();
    let series = ramp_series(CalendarKey::new(2001, 1).unwrap(), 1, 0.0);
    let writer = SeriesWriter::new(lat, lon).with_variable("v", "1", "v", &series);

    assert!(write_series(&path, &writer).is_err());
    assert!(!path.exists());
    assert!(!partial_path(&path).exists());
}

/// Hand-built file using short coordinate names, a `_FillValue`, and a 2-D
/// data variable.
fn write_foreign_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("chirps.nc");
    let mut file = netcdf::create(&path).unwrap();
    file.add_dimension("time", 1).unwrap();
    file.add_dimension("lat", 2).unwrap();
    file.add_dimension("lon", 3).unwrap();
    {
        let mut var = file.add_variable::<f64>("lat", &["lat"]).unwrap();
        var.put_values(&[-27.0, -26.95], ..).unwrap();
    }
    {
        let mut var = file.add_variable::<f64>("lon", &["lon"]).unwrap();
        var.put_values(&[31.0, 31.05, 31.1], ..).unwrap();
    }
    {
        let mut var = file.add_variable::<f64>("time", &["time"]).unwrap();
        var.put_attribute("units", "days since 1980-01-01").unwrap();
        var.put_values(&[31.0], ..).unwrap();
    }
    {
        let mut var = file.add_variable::<f64>("precip", &["lat", "lon"]).unwrap();
        var.put_attribute("_FillValue", 1e20).unwrap();
        var.put_attribute("units", "mm/month").unwrap();
        var.put_values(&[10.0, 1e20, 0.0, f64::NAN, 22.5, 3.0], ..)
            .unwrap();
    }
    path
}

#[test]
fn reads_aliases_fill_value_and_2d_variables() {
    let dir = tempdir().unwrap();
    let path = write_foreign_fixture(dir.path());

    let file = read_series(&path, &ReadRequest::new("precip")).unwrap();
    let series = file.series();
    assert_eq!(series.len(), 1);
    assert_eq!(series.keys()[0], CalendarKey::new(1980, 2).unwrap());
    assert_eq!(
        series.grids()[0].values(),
        &[10.0, MISSING, 0.0, MISSING, 22.5, 3.0]
    );
    assert!(file.latitude().is_ascending());
    assert_eq!(file.units(), Some("mm/month"));
}

#[test]
fn missing_variable_and_file() {
    let dir = tempdir().unwrap();
    let path = write_foreign_fixture(dir.path());

    let err = read_series(&path, &ReadRequest::new("lst")).unwrap_err();
    assert!(matches!(err, IoError::MissingVariable { ref name, .. } if name == "lst"));

    let err = read_series(&dir.path().join("absent.nc"), &ReadRequest::new("precip")).unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}

#[test]
fn custom_aliases() {
    let dir = tempdir().unwrap();
    let path = write_foreign_fixture(dir.path());
    let request = ReadRequest::new("precip").with_lat_aliases(["latitude"]);
    let err = read_series(&path, &request).unwrap_err();
    assert!(matches!(err, IoError::MissingVariable { ref name, .. } if name == "latitude"));
}

#[test]
fn single_row_takes_spacing_from_global_attribute() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("strip.nc");
    let lat = Axis::new(-26.0, -0.05, 1).unwrap();
    let lon = Axis::new(31.0, 0.05, 2).unwrap();
    let keys = monthly_sequence(CalendarKey::new(2001, 1).unwrap(), 1);
    let series = IndicatorSeries::from_parts(keys, vec![Grid::filled(1, 2, 0.5)]).unwrap();
    write_series(&path, &SeriesWriter::new(lat, lon).with_variable("v", "1", "v", &series)).unwrap();

    let back = read_series(&path, &ReadRequest::new("v")).unwrap();
    assert_eq!(back.latitude().len(), 1);
    assert_relative_eq!(back.latitude().spacing(), -0.05, epsilon = 1e-12);
    assert_eq!(back.series(), &series);
}
