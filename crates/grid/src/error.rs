//! Error types for the cdi-grid crate.

/// Error type for all fallible operations in the cdi-grid crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Returned when a data buffer does not match the requested shape.
    #[error("grid data has {len} values, expected {rows}x{cols}")]
    DataLength {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
        /// Actual buffer length.
        len: usize,
    },

    /// Returned when two grids that must agree in shape do not.
    #[error("grid shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Actual `(rows, cols)`.
        got: (usize, usize),
    },

    /// Returned when grid data contains NaN or infinity.
    #[error("non-finite value at flat index {index}")]
    NonFinite {
        /// Flat row-major index of the first offending value.
        index: usize,
    },

    /// Returned when an area of interest is malformed.
    #[error("invalid area of interest: {reason}")]
    InvalidAoi {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a coordinate axis is malformed.
    #[error("invalid {axis} axis: {reason}")]
    InvalidAxis {
        /// Axis name (for example "latitude").
        axis: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when an area of interest does not overlap a source axis.
    #[error("{axis} range [{lo}, {hi}] lies outside the source axis [{min}, {max}]")]
    AoiOutsideAxis {
        /// Axis name.
        axis: &'static str,
        /// Lower bound of the requested range.
        lo: f64,
        /// Upper bound of the requested range.
        hi: f64,
        /// Smallest coordinate on the axis.
        min: f64,
        /// Largest coordinate on the axis.
        max: f64,
    },

    /// Returned when a crop window exceeds the grid.
    #[error("crop window rows {rows:?} cols {cols:?} exceeds grid {shape:?}")]
    CropOutOfBounds {
        /// Requested row range.
        rows: std::ops::Range<usize>,
        /// Requested column range.
        cols: std::ops::Range<usize>,
        /// Grid `(rows, cols)`.
        shape: (usize, usize),
    },

    /// Returned when blend layers and weights disagree or are empty.
    #[error("blend needs one weight per layer: {layers} layers, {weights} weights")]
    BlendMismatch {
        /// Number of layers supplied.
        layers: usize,
        /// Number of weights supplied.
        weights: usize,
    },

    /// Calendar error.
    #[error(transparent)]
    Calendar(#[from] cdi_calendar::CalendarError),
}
