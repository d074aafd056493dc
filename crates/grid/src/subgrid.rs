//! Grid index mapping: locate an area of interest inside a source grid.

use std::ops::Range;

use tracing::debug;

use crate::aoi::Aoi;
use crate::axis::{Axis, round_coord};
use crate::error::GridError;
use crate::grid::Grid;

/// Index range on one axis covering the closed interval `[lo, hi]`.
///
/// Returns the half-open range of cells whose centers lie within or exactly
/// on the interval, widened by one cell on each side whose bound falls
/// between two centers. All comparisons use coordinates rounded to three
/// decimals. Works for ascending and descending axes; an interval narrower
/// than one cell yields the two bracketing cells.
///
/// # Errors
///
/// Returns [`GridError::AoiOutsideAxis`] if `[lo, hi]` does not overlap the
/// axis.
pub fn index_range(
    axis: &Axis,
    lo: f64,
    hi: f64,
    name: &'static str,
) -> Result<Range<usize>, GridError> {
    let (lo, hi) = (round_coord(lo.min(hi)), round_coord(lo.max(hi)));
    let (min, max) = (round_coord(axis.min()), round_coord(axis.max()));
    if hi < min || lo > max {
        return Err(GridError::AoiOutsideAxis {
            axis: name,
            lo,
            hi,
            min,
            max,
        });
    }

    // Work on ascending positions; map back at the end for descending axes.
    let n = axis.len();
    let at = |k: usize| {
        if axis.is_ascending() {
            round_coord(axis.coord(k))
        } else {
            round_coord(axis.coord(n - 1 - k))
        }
    };

    let mut first = (0..n).find(|&k| at(k) >= lo).unwrap_or(n);
    if first > 0 && (first == n || at(first) != lo) {
        first -= 1;
    }
    let mut last = (0..n).rev().find(|&k| at(k) <= hi).map_or(0, |k| k + 1);
    if last < n && (last == 0 || at(last - 1) != hi) {
        last += 1;
    }

    let range = if axis.is_ascending() {
        first..last
    } else {
        n - last..n - first
    };
    debug!(axis = name, lo, hi, start = range.start, end = range.end, "mapped index range");
    Ok(range)
}

/// Row and column window of a source grid covering an area of interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subgrid {
    /// Row (latitude) index range.
    pub rows: Range<usize>,
    /// Column (longitude) index range.
    pub cols: Range<usize>,
}

impl Subgrid {
    /// Maps `aoi` onto a source grid described by `lat` and `lon`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::AoiOutsideAxis`] if the area does not overlap
    /// either axis.
    pub fn locate(aoi: &Aoi, lat: &Axis, lon: &Axis) -> Result<Self, GridError> {
        let rows = index_range(lat, aoi.south(), aoi.north(), "latitude")?;
        let cols = index_range(lon, aoi.west(), aoi.east(), "longitude")?;
        Ok(Self { rows, cols })
    }

    /// Shape of the window as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    /// Copies the window out of `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CropOutOfBounds`] if the window exceeds `grid`.
    pub fn extract(&self, grid: &Grid) -> Result<Grid, GridError> {
        grid.crop(self.rows.clone(), self.cols.clone())
    }

    /// Latitude and longitude axes of the window.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidAxis`] if the window exceeds the axes.
    pub fn axes(&self, lat: &Axis, lon: &Axis) -> Result<(Axis, Axis), GridError> {
        Ok((lat.slice(self.rows.clone())?, lon.slice(self.cols.clone())?))
    }
}
