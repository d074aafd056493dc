//! Standardized anomalies over a month slice.

use std::borrow::Borrow;

use cdi_grid::{Grid, IndicatorSeries, MISSING};
use tracing::debug;

use crate::error::StatsError;
use crate::moments::{mean, sd, slice_shape, valid_years};

/// Converts one month slice (one grid per year, ascending) into anomalies.
///
/// Per cell, over the years whose value is not the sentinel:
/// `anomaly = (value - mean) / sd` with the N-1 sample standard deviation.
/// A cell is sentinel when the input is sentinel, fewer than two years are
/// valid, the standard deviation is zero, or the result is not finite.
///
/// # Errors
///
/// Returns [`StatsError::SliceShape`] if the grids differ in shape.
pub fn anomalies<G: Borrow<Grid>>(slice: &[G]) -> Result<Vec<Grid>, StatsError> {
    let Some((rows, cols)) = slice_shape(slice)? else {
        return Ok(Vec::new());
    };
    let n_cells = rows * cols;
    let mut out: Vec<Vec<f64>> = vec![vec![MISSING; n_cells]; slice.len()];
    let mut years = Vec::with_capacity(slice.len());
    let mut values = Vec::with_capacity(slice.len());
    let mut degenerate = 0usize;

    for cell in 0..n_cells {
        valid_years(slice, cell, &mut years);
        values.clear();
        values.extend(years.iter().map(|&(_, v)| v));

        let (Some(m), Some(s)) = (mean(&values), sd(&values)) else {
            continue;
        };
        if s == 0.0 || !s.is_finite() {
            degenerate += 1;
            continue;
        }
        for &(year, v) in &years {
            let a = (v - m) / s;
            if a.is_finite() {
                out[year][cell] = a;
            }
        }
    }

    if degenerate > 0 {
        debug!(degenerate, n_cells, "cells with zero spread left missing");
    }

    out.into_iter()
        .map(|data| Grid::new(rows, cols, data).map_err(StatsError::from))
        .collect()
}

/// Applies [`anomalies`] to each month of year and restores chronological
/// order.
///
/// # Errors
///
/// Propagates [`StatsError`] from the per-month computation.
pub fn anomalies_by_month(series: &IndicatorSeries) -> Result<IndicatorSeries, StatsError> {
    series.map_month_slices(|month, slice| {
        debug!(month, years = slice.len(), "computing anomalies");
        anomalies(slice)
    })
}
