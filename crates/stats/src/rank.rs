//! Tie-aware mean-rank percentiles over a month slice.

use std::borrow::Borrow;

use cdi_grid::{Grid, IndicatorSeries, MISSING, round_to};
use tracing::debug;

use crate::error::StatsError;
use crate::moments::{slice_shape, valid_years};

/// Decimal places kept in percentile ranks.
pub const RANK_DECIMALS: i32 = 3;

/// Converts one month slice (one grid per year, ascending) into percentile
/// ranks on `[0, 1]`.
///
/// For each cell, every valid year `j` is compared against every other valid
/// year `i`: `strict` counts `x_j > x_i`, `weak` counts `x_j >= x_i`, and the
/// score is `(strict + weak) / 2`. Scores are divided by the cell's highest
/// score plus one and rounded to [`RANK_DECIMALS`]. Sentinel inputs give
/// sentinel outputs, so a year whose whole grid is missing drops out of every
/// comparison. A single valid year ranks 0.
///
/// # Errors
///
/// Returns [`StatsError::SliceShape`] if the grids differ in shape.
pub fn percentile_ranks<G: Borrow<Grid>>(slice: &[G]) -> Result<Vec<Grid>, StatsError> {
    let Some((rows, cols)) = slice_shape(slice)? else {
        return Ok(Vec::new());
    };
    let skipped = slice.iter().filter(|g| (*g).borrow().is_all_missing()).count();
    if skipped > 0 {
        debug!(skipped, years = slice.len(), "years without data excluded from ranking");
    }

    let n_cells = rows * cols;
    let mut out: Vec<Vec<f64>> = vec![vec![MISSING; n_cells]; slice.len()];
    let mut years = Vec::with_capacity(slice.len());
    let mut scores = Vec::with_capacity(slice.len());

    for cell in 0..n_cells {
        valid_years(slice, cell, &mut years);
        if years.is_empty() {
            continue;
        }

        scores.clear();
        for (j, &(_, xj)) in years.iter().enumerate() {
            let mut strict = 0u32;
            let mut weak = 0u32;
            for (i, &(_, xi)) in years.iter().enumerate() {
                if i == j {
                    continue;
                }
                if xj > xi {
                    strict += 1;
                }
                if xj >= xi {
                    weak += 1;
                }
            }
            scores.push(f64::from(strict + weak) * 0.5);
        }

        let max = scores.iter().copied().fold(0.0, f64::max);
        let denom = max + 1.0;
        for (&(year, _), &score) in years.iter().zip(&scores) {
            out[year][cell] = round_to(score / denom, RANK_DECIMALS);
        }
    }

    out.into_iter()
        .map(|data| Grid::new(rows, cols, data).map_err(StatsError::from))
        .collect()
}

/// Applies [`percentile_ranks`] to each month of year and restores
/// chronological order.
///
/// # Errors
///
/// Propagates [`StatsError`] from the per-month computation.
pub fn ranks_by_month(series: &IndicatorSeries) -> Result<IndicatorSeries, StatsError> {
    series.map_month_slices(|month, slice| {
        debug!(month, years = slice.len(), "ranking");
        percentile_ranks(slice)
    })
}
