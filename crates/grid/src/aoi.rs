//! Rectangular area of interest.

use crate::axis::Axis;
use crate::error::GridError;

/// Slack added before truncating a coordinate extent into a cell count.
pub const COUNT_EPSILON: f64 = 1e-9;

/// Number of cell centers spanning `extent` at `spacing`, both ends included.
pub fn cell_count(extent: f64, spacing: f64) -> usize {
    (extent.abs() / spacing.abs() + COUNT_EPSILON).trunc() as usize + 1
}

/// A geographic rectangle in decimal degrees.
///
/// Invariant: all edges finite, `west < east` and `south < north`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aoi {
    west: f64,
    east: f64,
    north: f64,
    south: f64,
}

impl Aoi {
    /// Creates a validated area of interest.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidAoi`] if an edge is not finite or the
    /// rectangle is empty or inverted.
    pub fn new(west: f64, east: f64, north: f64, south: f64) -> Result<Self, GridError> {
        if ![west, east, north, south].iter().all(|v| v.is_finite()) {
            return Err(GridError::InvalidAoi {
                reason: "edges must be finite".to_string(),
            });
        }
        if west >= east {
            return Err(GridError::InvalidAoi {
                reason: format!("west ({west}) must be less than east ({east})"),
            });
        }
        if south >= north {
            return Err(GridError::InvalidAoi {
                reason: format!("south ({south}) must be less than north ({north})"),
            });
        }
        Ok(Self {
            west,
            east,
            north,
            south,
        })
    }

    /// Western edge.
    pub fn west(&self) -> f64 {
        self.west
    }

    /// Eastern edge.
    pub fn east(&self) -> f64 {
        self.east
    }

    /// Northern edge.
    pub fn north(&self) -> f64 {
        self.north
    }

    /// Southern edge.
    pub fn south(&self) -> f64 {
        self.south
    }

    /// Number of latitude rows at `spacing`.
    pub fn rows(&self, spacing: f64) -> usize {
        cell_count(self.north - self.south, spacing)
    }

    /// Number of longitude columns at `spacing`.
    pub fn cols(&self, spacing: f64) -> usize {
        cell_count(self.east - self.west, spacing)
    }

    /// Region latitudes from north to south at `spacing`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidAxis`] if `spacing` is zero or not finite.
    pub fn latitudes(&self, spacing: f64) -> Result<Axis, GridError> {
        check_spacing(spacing)?;
        Axis::new(self.north, -spacing.abs(), self.rows(spacing))
    }

    /// Region longitudes from west to east at `spacing`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidAxis`] if `spacing` is zero or not finite.
    pub fn longitudes(&self, spacing: f64) -> Result<Axis, GridError> {
        check_spacing(spacing)?;
        Axis::new(self.west, spacing.abs(), self.cols(spacing))
    }
}

fn check_spacing(spacing: f64) -> Result<(), GridError> {
    if !spacing.is_finite() || spacing == 0.0 {
        return Err(GridError::InvalidAxis {
            axis: "region",
            reason: format!("spacing must be finite and non-zero, got {spacing}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eswatini() -> Aoi {
        Aoi::new(30.75, 32.20, -25.70, -27.35).unwrap()
    }

    #[test]
    fn rejects_inverted() {
        assert!(matches!(
            Aoi::new(32.0, 31.0, -25.0, -27.0),
            Err(GridError::InvalidAoi { .. })
        ));
        assert!(matches!(
            Aoi::new(31.0, 32.0, -27.0, -25.0),
            Err(GridError::InvalidAoi { .. })
        ));
        assert!(Aoi::new(31.0, 31.0, -25.0, -27.0).is_err());
        assert!(Aoi::new(f64::NAN, 32.0, -25.0, -27.0).is_err());
    }

    #[test]
    fn region_shape_at_five_km() {
        let aoi = eswatini();
        // |−25.70 − −27.35| * 20 = 33 -> 34 rows; 1.45 * 20 = 29 -> 30 cols
        assert_eq!(aoi.rows(0.05), 34);
        assert_eq!(aoi.cols(0.05), 30);
    }

    #[test]
    fn region_axes() {
        let aoi = eswatini();
        let lat = aoi.latitudes(0.05).unwrap();
        let lon = aoi.longitudes(0.05).unwrap();
        assert!(!lat.is_ascending());
        assert_relative_eq!(lat.origin(), -25.70);
        assert_relative_eq!(lat.last(), -27.35, epsilon = 1e-9);
        assert!(lon.is_ascending());
        assert_relative_eq!(lon.last(), 32.20, epsilon = 1e-9);
    }

    #[test]
    fn zero_spacing_rejected() {
        assert!(eswatini().latitudes(0.0).is_err());
    }
}
