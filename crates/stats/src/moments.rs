//! Sample moments over the valid years of a cell.

use std::borrow::Borrow;

use cdi_grid::{Grid, is_missing};

use crate::error::StatsError;

/// Arithmetic mean. Returns `None` if empty.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample variance with N-1 denominator. Returns `None` with fewer than two
/// values.
pub fn variance(data: &[f64]) -> Option<f64> {
    let n = data.len();
    if n < 2 {
        return None;
    }
    let m = mean(data)?;
    Some(data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (n - 1) as f64)
}

/// Sample standard deviation with N-1 denominator.
pub fn sd(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// Common shape of a month slice, or `None` if the slice is empty.
pub(crate) fn slice_shape<G: Borrow<Grid>>(
    slice: &[G],
) -> Result<Option<(usize, usize)>, StatsError> {
    let Some(first) = slice.first() else {
        return Ok(None);
    };
    let expected = first.borrow().shape();
    for (index, g) in slice.iter().enumerate().skip(1) {
        let got = g.borrow().shape();
        if got != expected {
            return Err(StatsError::SliceShape {
                index,
                expected,
                got,
            });
        }
    }
    Ok(Some(expected))
}

/// Collects `(year, value)` for the non-sentinel years of flat cell `cell`.
pub(crate) fn valid_years<G: Borrow<Grid>>(
    slice: &[G],
    cell: usize,
    out: &mut Vec<(usize, f64)>,
) {
    out.clear();
    for (year, g) in slice.iter().enumerate() {
        let v = g.borrow().values()[cell];
        if !is_missing(v) {
            out.push((year, v));
        }
    }
}
