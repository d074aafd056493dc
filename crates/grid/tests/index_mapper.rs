use cdi_grid::{Aoi, Axis, Grid, GridError, MISSING, Subgrid, index_range};

/// A 0.05 degree global-style latitude axis stored south to north.
fn chirps_lat() -> Axis {
    Axis::new(-49.975, 0.05, 2000).unwrap()
}

fn chirps_lon() -> Axis {
    Axis::new(-179.975, 0.05, 7200).unwrap()
}

#[test]
fn full_axis_range_returns_everything() {
    let lat = chirps_lat();
    let lon = chirps_lon();
    assert_eq!(
        index_range(&lat, lat.min(), lat.max(), "latitude").unwrap(),
        0..lat.len()
    );
    assert_eq!(
        index_range(&lon, lon.min(), lon.max(), "longitude").unwrap(),
        0..lon.len()
    );
}

#[test]
fn full_axis_range_from_explicit_values() {
    let values: Vec<f64> = (0..40).map(|i| 10.0 - 0.25 * f64::from(i)).collect();
    let axis = Axis::from_values(&values).unwrap();
    assert_eq!(index_range(&axis, 0.25, 10.0, "latitude").unwrap(), 0..40);
}

#[test]
fn eswatini_window_on_five_km_source() {
    let aoi = Aoi::new(30.75, 32.20, -25.70, -27.35).unwrap();
    let sub = Subgrid::locate(&aoi, &chirps_lat(), &chirps_lon()).unwrap();

    // Off-grid edges (centers sit on .x25/.x75) widen by one cell per side.
    assert_eq!(sub.shape(), (35, 31));
    let (lat, lon) = sub.axes(&chirps_lat(), &chirps_lon()).unwrap();
    assert!(lat.min() < aoi.south() && lat.max() > aoi.north());
    assert!(lon.min() < aoi.west() && lon.max() > aoi.east());
}

#[test]
fn extract_copies_window() {
    let lat = Axis::new(0.0, 1.0, 4).unwrap();
    let lon = Axis::new(0.0, 1.0, 4).unwrap();
    let mut data: Vec<f64> = (0..16).map(f64::from).collect();
    data[5] = MISSING;
    let grid = Grid::new(4, 4, data).unwrap();

    let aoi = Aoi::new(1.0, 2.0, 2.0, 1.0).unwrap();
    let out = Subgrid::locate(&aoi, &lat, &lon)
        .unwrap()
        .extract(&grid)
        .unwrap();
    assert_eq!(out.values(), &[MISSING, 6.0, 9.0, 10.0]);
}

#[test]
fn disjoint_aoi_is_configuration_error() {
    let aoi = Aoi::new(100.0, 101.0, 80.0, 79.0).unwrap();
    let err = Subgrid::locate(&aoi, &chirps_lat(), &chirps_lon()).unwrap_err();
    assert!(matches!(
        err,
        GridError::AoiOutsideAxis {
            axis: "latitude",
            ..
        }
    ));
}
