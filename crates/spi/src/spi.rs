//! Standardized Precipitation Index over a month slice.

use std::borrow::Borrow;

use cdi_grid::{Grid, IndicatorSeries, MISSING, is_missing};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use crate::error::SpiError;
use crate::gamma::GammaFit;

/// Standard normal quantile, or `None` where it is infinite or undefined.
fn probit(normal: &Normal, p: f64) -> Option<f64> {
    if !(p > 0.0 && p < 1.0) {
        return None;
    }
    Some(normal.inverse_cdf(p)).filter(|z| z.is_finite())
}

/// Converts one month slice of precipitation totals (one grid per year,
/// ascending) into SPI values.
///
/// Per cell, the valid years are the non-sentinel, non-negative totals. A
/// [`GammaFit`] is estimated over them and each valid total `x` maps to
/// `probit(H(x))`; an exact zero maps to `probit(q)`. Sentinel or negative
/// inputs, cells that cannot be fit, and infinite probits (`H` of 0 or 1)
/// give sentinel cells.
///
/// # Errors
///
/// Returns a grid shape error if the grids differ in shape.
pub fn spi<G: Borrow<Grid>>(slice: &[G]) -> Result<Vec<Grid>, SpiError> {
    let Some(first) = slice.first() else {
        return Ok(Vec::new());
    };
    let first: &Grid = first.borrow();
    for g in &slice[1..] {
        first.check_same_shape(g.borrow())?;
    }
    let normal = Normal::new(0.0, 1.0).map_err(|e| SpiError::Distribution {
        message: e.to_string(),
    })?;

    let (rows, cols) = first.shape();
    let n_cells = rows * cols;
    let mut out: Vec<Vec<f64>> = vec![vec![MISSING; n_cells]; slice.len()];
    let mut column = Vec::with_capacity(slice.len());
    let mut unfit = 0usize;

    for cell in 0..n_cells {
        column.clear();
        column.extend(
            slice
                .iter()
                .enumerate()
                .map(|(year, g)| (year, g.borrow().values()[cell]))
                .filter(|&(_, v)| !is_missing(v) && v >= 0.0),
        );
        if column.is_empty() {
            continue;
        }
        let totals: Vec<f64> = column.iter().map(|&(_, v)| v).collect();
        let Some(fit) = GammaFit::fit(&totals) else {
            unfit += 1;
            continue;
        };
        for &(year, v) in &column {
            if let Some(z) = probit(&normal, fit.cumulative(v)) {
                out[year][cell] = z;
            }
        }
    }

    if unfit > 0 {
        debug!(unfit, n_cells, "cells without non-zero totals left missing");
    }

    out.into_iter()
        .map(|data| Grid::new(rows, cols, data).map_err(SpiError::from))
        .collect()
}

/// Applies [`spi`] to each month of year and restores chronological order.
///
/// # Errors
///
/// Propagates [`SpiError`] from the per-month computation.
pub fn spi_by_month(series: &IndicatorSeries) -> Result<IndicatorSeries, SpiError> {
    series.map_month_slices(|month, slice| {
        debug!(month, years = slice.len(), "computing SPI");
        spi(slice)
    })
}
