//! Fixed-spacing coordinate axes.

use crate::error::GridError;

/// Decimal places used for every coordinate comparison.
pub const COORD_DECIMALS: i32 = 3;

/// Rounds `value` to `decimals` decimal places by scaling, rounding half to
/// even, and scaling back.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Rounds the exact decimal expansion of `value` to `decimals` places, ties
/// to even.
///
/// Unlike [`round_to`] no scaled intermediate is formed, so `30.75` becomes
/// `30.8` and `-27.35` (stored just below `-27.35`) becomes `-27.4`.
pub fn round_decimal(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

/// Rounds a coordinate to [`COORD_DECIMALS`].
#[inline]
pub fn round_coord(value: f64) -> f64 {
    round_to(value, COORD_DECIMALS)
}

/// A strictly monotonic axis of cell centers at fixed spacing.
///
/// Coordinate `i` is `origin + i * spacing`; a negative spacing gives a
/// descending axis (the usual north-to-south latitude layout).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    origin: f64,
    spacing: f64,
    len: usize,
}

impl Axis {
    /// Creates an axis from its first coordinate, signed spacing and length.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidAxis`] if `origin` or `spacing` is not
    /// finite, `spacing` is zero, or `len` is zero.
    pub fn new(origin: f64, spacing: f64, len: usize) -> Result<Self, GridError> {
        if !origin.is_finite() || !spacing.is_finite() {
            return Err(invalid("origin and spacing must be finite"));
        }
        if spacing == 0.0 {
            return Err(invalid("spacing must be non-zero"));
        }
        if len == 0 {
            return Err(invalid("axis must have at least one coordinate"));
        }
        Ok(Self {
            origin,
            spacing,
            len,
        })
    }

    /// Builds an axis from explicit coordinate values.
    ///
    /// Values must be finite, strictly monotonic and evenly spaced; each step
    /// may deviate from the mean spacing by at most one unit of the third
    /// decimal (coordinates stored as `f32` are common).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidAxis`] if fewer than two values are given
    /// or the values are not a fixed-spacing monotonic sequence.
    pub fn from_values(values: &[f64]) -> Result<Self, GridError> {
        if values.len() < 2 {
            return Err(invalid("at least two coordinates are required"));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(invalid("coordinates must be finite"));
        }
        let n = values.len();
        let spacing = (values[n - 1] - values[0]) / (n - 1) as f64;
        if spacing == 0.0 {
            return Err(invalid("coordinates must be strictly monotonic"));
        }
        let tolerance = 10f64.powi(-COORD_DECIMALS) + 1e-9;
        for (i, pair) in values.windows(2).enumerate() {
            let step = round_coord(pair[1]) - round_coord(pair[0]);
            if step.signum() != spacing.signum() || step == 0.0 {
                return Err(invalid(&format!(
                    "coordinates are not strictly monotonic at index {}",
                    i + 1
                )));
            }
            if (step - spacing).abs() > tolerance {
                return Err(invalid(&format!(
                    "step {step} at index {} differs from spacing {spacing}",
                    i + 1
                )));
            }
        }
        Ok(Self {
            origin: values[0],
            spacing,
            len: n,
        })
    }

    /// First coordinate.
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Signed spacing between consecutive coordinates.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Number of coordinates.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; axes have at least one coordinate.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether coordinates increase with index.
    pub fn is_ascending(&self) -> bool {
        self.spacing > 0.0
    }

    /// Coordinate at index `i` (not bounds-checked; extrapolates past the end).
    pub fn coord(&self, i: usize) -> f64 {
        self.origin + i as f64 * self.spacing
    }

    /// Last coordinate.
    pub fn last(&self) -> f64 {
        self.coord(self.len - 1)
    }

    /// Smallest coordinate.
    pub fn min(&self) -> f64 {
        self.origin.min(self.last())
    }

    /// Largest coordinate.
    pub fn max(&self) -> f64 {
        self.origin.max(self.last())
    }

    /// All coordinates, each rounded to [`COORD_DECIMALS`].
    pub fn values(&self) -> Vec<f64> {
        (0..self.len).map(|i| round_coord(self.coord(i))).collect()
    }

    /// Sub-axis covering `range`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidAxis`] if the range is empty or exceeds
    /// the axis.
    pub fn slice(&self, range: std::ops::Range<usize>) -> Result<Self, GridError> {
        if range.is_empty() || range.end > self.len {
            return Err(invalid(&format!(
                "range {range:?} is not within 0..{}",
                self.len
            )));
        }
        Ok(Self {
            origin: self.coord(range.start),
            spacing: self.spacing,
            len: range.len(),
        })
    }

    /// The same coordinates in reverse order.
    pub fn reversed(&self) -> Self {
        Self {
            origin: self.last(),
            spacing: -self.spacing,
            len: self.len,
        }
    }
}

fn invalid(reason: &str) -> GridError {
    GridError::InvalidAxis {
        axis: "coordinate",
        reason: reason.to_string(),
    }
}
