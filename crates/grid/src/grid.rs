//! Sentinel-masked 2-D grid.

use std::ops::Range;

use crate::error::GridError;

/// Missing-value sentinel shared by every grid, file and engine.
pub const MISSING: f64 = -9999.0;

/// Returns `true` if `value` is the missing-value sentinel.
#[inline]
pub fn is_missing(value: f64) -> bool {
    value == MISSING
}

/// A row-major 2-D array of `f64` cells.
///
/// Every cell is either a finite measurement or exactly [`MISSING`]; NaN and
/// infinity never appear. Grids are immutable: transformations return new
/// grids.
///
/// # Example
///
/// ```ignore
/// use cdi_grid::{Grid, MISSING};
///
/// let g = Grid::new(2, 2, vec![1.0, MISSING, 3.0, 4.0]).unwrap();
/// assert_eq!(g.valid_count(), 3);
/// assert!(g.is_missing_at(0, 1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    /// Creates a grid from row-major `data`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DataLength`] if `data.len() != rows * cols`, or
    /// [`GridError::NonFinite`] if any value is NaN or infinite.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, GridError> {
        check_len(rows, cols, data.len())?;
        if let Some(index) = data.iter().position(|v| !v.is_finite()) {
            return Err(GridError::NonFinite { index });
        }
        Ok(Self { rows, cols, data })
    }

    /// Creates a grid from row-major `data`, replacing NaN and infinity with
    /// the sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DataLength`] if `data.len() != rows * cols`.
    pub fn from_lossy(rows: usize, cols: usize, mut data: Vec<f64>) -> Result<Self, GridError> {
        check_len(rows, cols, data.len())?;
        for v in &mut data {
            if !v.is_finite() {
                *v = MISSING;
            }
        }
        Ok(Self { rows, cols, data })
    }

    /// Creates a grid with every cell set to `value` (sentinel if non-finite).
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        let value = if value.is_finite() { value } else { MISSING };
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Creates an all-sentinel grid.
    pub fn missing(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, MISSING)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Dimensions as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(row, col)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Row-major cell values.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Consumes the grid and returns its row-major values.
    pub fn into_values(self) -> Vec<f64> {
        self.data
    }

    /// Whether `(row, col)` holds the sentinel. Out-of-bounds cells count as
    /// missing.
    pub fn is_missing_at(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_none_or(is_missing)
    }

    /// Number of non-sentinel cells.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|&&v| !is_missing(v)).count()
    }

    /// Whether every cell is the sentinel. An empty grid counts as missing.
    pub fn is_all_missing(&self) -> bool {
        self.data.iter().all(|&v| is_missing(v))
    }

    /// Copies the window `rows x cols` into a new grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CropOutOfBounds`] if the window is inverted or
    /// extends past the grid.
    pub fn crop(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Self, GridError> {
        if rows.start > rows.end
            || cols.start > cols.end
            || rows.end > self.rows
            || cols.end > self.cols
        {
            return Err(GridError::CropOutOfBounds {
                rows,
                cols,
                shape: self.shape(),
            });
        }
        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for r in rows.clone() {
            let base = r * self.cols;
            data.extend_from_slice(&self.data[base + cols.start..base + cols.end]);
        }
        Ok(Self {
            rows: rows.len(),
            cols: cols.len(),
            data,
        })
    }

    /// Reverses the row order (south-up to north-up and back).
    pub fn flip_rows(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for r in (0..self.rows).rev() {
            let base = r * self.cols;
            data.extend_from_slice(&self.data[base..base + self.cols]);
        }
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    /// Applies `f` to every valid cell; sentinel cells stay sentinel and
    /// non-finite results become sentinel.
    pub fn map_valid<F: FnMut(f64) -> f64>(&self, mut f: F) -> Self {
        let data = self
            .data
            .iter()
            .map(|&v| {
                if is_missing(v) {
                    return MISSING;
                }
                let out = f(v);
                if out.is_finite() { out } else { MISSING }
            })
            .collect();
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    /// Returns an error unless `other` has the same shape as `self`.
    pub fn check_same_shape(&self, other: &Grid) -> Result<(), GridError> {
        if self.shape() != other.shape() {
            return Err(GridError::ShapeMismatch {
                expected: self.shape(),
                got: other.shape(),
            });
        }
        Ok(())
    }
}

fn check_len(rows: usize, cols: usize, len: usize) -> Result<(), GridError> {
    if rows.checked_mul(cols) != Some(len) {
        return Err(GridError::DataLength { rows, cols, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        // 3x2: [[1, 2], [3, MISSING], [5, 6]]
        Grid::new(3, 2, vec![1.0, 2.0, 3.0, MISSING, 5.0, 6.0]).unwrap()
    }

    #[test]
    fn new_rejects_bad_length() {
        assert_eq!(
            Grid::new(2, 2, vec![1.0; 3]).unwrap_err(),
            GridError::DataLength {
                rows: 2,
                cols: 2,
                len: 3
            }
        );
    }

    #[test]
    fn new_rejects_nan() {
        let err = Grid::new(1, 3, vec![1.0, f64::NAN, 2.0]).unwrap_err();
        assert_eq!(err, GridError::NonFinite { index: 1 });
    }

    #[test]
    fn lossy_replaces_non_finite() {
        let g = Grid::from_lossy(1, 3, vec![f64::INFINITY, 2.0, f64::NAN]).unwrap();
        assert_eq!(g.values(), &[MISSING, 2.0, MISSING]);
    }

    #[test]
    fn filled_with_nan_is_missing() {
        assert!(Grid::filled(2, 2, f64::NAN).is_all_missing());
    }

    #[test]
    fn accessors() {
        let g = sample();
        assert_eq!(g.shape(), (3, 2));
        assert_eq!(g.len(), 6);
        assert_eq!(g.get(2, 1), Some(6.0));
        assert_eq!(g.get(3, 0), None);
        assert!(g.is_missing_at(1, 1));
        assert!(!g.is_missing_at(1, 0));
        assert!(g.is_missing_at(9, 9));
        assert_eq!(g.valid_count(), 5);
        assert!(!g.is_all_missing());
    }

    #[test]
    fn empty_grid_is_all_missing() {
        let g = Grid::new(0, 0, Vec::new()).unwrap();
        assert!(g.is_empty());
        assert!(g.is_all_missing());
    }

    #[test]
    fn crop_window() {
        let g = sample();
        let c = g.crop(1..3, 0..1).unwrap();
        assert_eq!(c.shape(), (2, 1));
        assert_eq!(c.values(), &[3.0, 5.0]);
    }

    #[test]
    fn crop_out_of_bounds() {
        let g = sample();
        assert!(matches!(
            g.crop(0..4, 0..2),
            Err(GridError::CropOutOfBounds { .. })
        ));
    }

    #[test]
    fn flip_rows_reverses() {
        let g = sample().flip_rows();
        assert_eq!(g.values(), &[5.0, 6.0, 3.0, MISSING, 1.0, 2.0]);
        assert_eq!(g.flip_rows(), sample());
    }

    #[test]
    fn map_valid_keeps_sentinel() {
        let g = sample().map_valid(|v| v * 10.0);
        assert_eq!(g.values(), &[10.0, 20.0, 30.0, MISSING, 50.0, 60.0]);
    }

    #[test]
    fn map_valid_masks_non_finite_results() {
        let g = Grid::new(1, 2, vec![0.0, 2.0]).unwrap();
        let out = g.map_valid(|v| 1.0 / v);
        assert_eq!(out.values(), &[MISSING, 0.5]);
    }

    #[test]
    fn same_shape_check() {
        let a = Grid::missing(2, 3);
        let b = Grid::missing(3, 2);
        assert!(a.check_same_shape(&a.clone()).is_ok());
        assert!(matches!(
            a.check_same_shape(&b),
            Err(GridError::ShapeMismatch { .. })
        ));
    }
}
