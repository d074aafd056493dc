//! Monthly indicator series: calendar-keyed grids of one quantity.

use cdi_calendar::{CalendarKey, MonthSlices};

use crate::error::GridError;
use crate::grid::Grid;

/// Chronologically ordered `(CalendarKey, Grid)` pairs for one quantity.
///
/// Invariants, checked at construction: keys strictly increasing and every
/// grid the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    keys: Vec<CalendarKey>,
    grids: Vec<Grid>,
    slices: MonthSlices,
}

impl IndicatorSeries {
    /// Builds a series from `(key, grid)` entries.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Calendar`] if keys are not strictly increasing,
    /// or [`GridError::ShapeMismatch`] if grids differ in shape.
    pub fn new(entries: Vec<(CalendarKey, Grid)>) -> Result<Self, GridError> {
        let (keys, grids) = entries.into_iter().unzip();
        Self::from_parts(keys, grids)
    }

    /// Builds a series from parallel key and grid vectors.
    ///
    /// # Errors
    ///
    /// As [`IndicatorSeries::new`], plus [`GridError::Calendar`] when the two
    /// vectors differ in length.
    pub fn from_parts(keys: Vec<CalendarKey>, grids: Vec<Grid>) -> Result<Self, GridError> {
        if keys.len() != grids.len() {
            return Err(cdi_calendar::CalendarError::LengthMismatch {
                keys: keys.len(),
                items: grids.len(),
            }
            .into());
        }
        let slices = MonthSlices::partition(&keys)?;
        if let Some(first) = grids.first() {
            for g in &grids[1..] {
                first.check_same_shape(g)?;
            }
        }
        Ok(Self {
            keys,
            grids,
            slices,
        })
    }

    /// Number of time steps.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the series has no time steps.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Shared grid shape, or `None` for an empty series.
    pub fn shape(&self) -> Option<(usize, usize)> {
        self.grids.first().map(Grid::shape)
    }

    /// Calendar keys in chronological order.
    pub fn keys(&self) -> &[CalendarKey] {
        &self.keys
    }

    /// Grids in chronological order.
    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }

    /// Iterates over `(key, grid)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (CalendarKey, &Grid)> {
        self.keys.iter().copied().zip(self.grids.iter())
    }

    /// Grid stored for `key`, if any.
    pub fn get(&self, key: CalendarKey) -> Option<&Grid> {
        self.keys
            .binary_search(&key)
            .ok()
            .map(|i| &self.grids[i])
    }

    /// Day offsets since 1900-01-01 of every key.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Calendar`] for keys outside the supported range.
    pub fn day_offsets(&self) -> Result<Vec<i64>, GridError> {
        Ok(self
            .keys
            .iter()
            .map(|k| k.day_offset())
            .collect::<Result<_, _>>()?)
    }

    /// Whether keys are consecutive calendar months.
    pub fn is_contiguous(&self) -> bool {
        cdi_calendar::is_contiguous(&self.keys)
    }

    /// Positions of each month of year.
    pub fn month_slices(&self) -> &MonthSlices {
        &self.slices
    }

    /// Applies a month-slice engine to every month of year and interleaves
    /// the results back into chronological order.
    ///
    /// `f` receives the month (1..=12) and borrows of that month's grids in
    /// ascending year order, and must return one grid per input grid.
    ///
    /// # Errors
    ///
    /// Propagates errors from `f`; returns a [`GridError`] (converted into
    /// `E`) if `f` returns the wrong number of grids or grids of a different
    /// shape.
    pub fn map_month_slices<E, F>(&self, mut f: F) -> Result<IndicatorSeries, E>
    where
        E: From<GridError>,
        F: FnMut(u8, &[&Grid]) -> Result<Vec<Grid>, E>,
    {
        let slices = &self.slices;
        let mut results = Vec::with_capacity(12);
        for (month, positions) in slices.iter() {
            let group: Vec<&Grid> = positions.iter().map(|&p| &self.grids[p]).collect();
            results.push((month, f(month, &group)?));
        }
        let grids = slices
            .interleave(results)
            .map_err(|e| E::from(GridError::from(e)))?;
        Ok(IndicatorSeries::from_parts(self.keys.clone(), grids)?)
    }

    /// Applies `f` to every grid, keeping the keys.
    ///
    /// # Errors
    ///
    /// Propagates errors from `f`, or [`GridError::ShapeMismatch`] if the
    /// outputs disagree in shape.
    pub fn try_map_grids<E, F>(&self, mut f: F) -> Result<IndicatorSeries, E>
    where
        E: From<GridError>,
        F: FnMut(CalendarKey, &Grid) -> Result<Grid, E>,
    {
        let grids = self
            .iter()
            .map(|(k, g)| f(k, g))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(IndicatorSeries::from_parts(self.keys.clone(), grids)?)
    }
}
