//! Rolling multi-month precipitation totals.

use cdi_grid::{Grid, IndicatorSeries, MISSING, is_missing};
use tracing::debug;

use crate::error::SpiError;

/// Sums each month with the `period - 1` months before it.
///
/// The series must be monthly contiguous. Per cell, sentinel months are
/// skipped and a window with no valid month gives the sentinel. The first
/// `period - 1` entries have an incomplete window and are all-sentinel
/// grids. A period of one returns a copy.
///
/// # Errors
///
/// Returns [`SpiError::InvalidPeriod`] for a zero period and
/// [`SpiError::NonContiguousSeries`] if consecutive keys skip a month.
pub fn period_totals(series: &IndicatorSeries, period: usize) -> Result<IndicatorSeries, SpiError> {
    if period == 0 {
        return Err(SpiError::InvalidPeriod { period });
    }
    if let Some(pair) = series.keys().windows(2).find(|w| w[0].next() != w[1]) {
        return Err(SpiError::NonContiguousSeries {
            previous: pair[0],
            next: pair[1],
        });
    }
    if period == 1 {
        return Ok(series.clone());
    }
    let Some((rows, cols)) = series.shape() else {
        return Ok(series.clone());
    };

    debug!(period, months = series.len(), "rolling totals");
    let grids = series.grids();
    let totals = (0..grids.len())
        .map(|t| {
            if t + 1 < period {
                return Ok(Grid::missing(rows, cols));
            }
            window_total(&grids[t + 1 - period..=t], rows, cols)
        })
        .collect::<Result<Vec<_>, SpiError>>()?;

    Ok(IndicatorSeries::from_parts(series.keys().to_vec(), totals)?)
}

fn window_total(window: &[Grid], rows: usize, cols: usize) -> Result<Grid, SpiError> {
    let data = (0..rows * cols)
        .map(|cell| {
            let mut valid = window
                .iter()
                .map(|g| g.values()[cell])
                .filter(|&v| !is_missing(v))
                .peekable();
            if valid.peek().is_none() {
                MISSING
            } else {
                valid.sum()
            }
        })
        .collect();
    Ok(Grid::new(rows, cols, data)?)
}
