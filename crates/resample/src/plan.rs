//! Resampling plan: bounding box, crop window and output shape for an AOI.

use std::ops::Range;

use cdi_grid::{Aoi, Axis, COUNT_EPSILON, Grid, Subgrid, cell_count, round_decimal};
use tracing::debug;

use crate::bilinear::bilinear_upsample;
use crate::error::ResampleError;

/// Everything needed to turn a coarse source grid into the region grid.
///
/// The bounding box is the block of source cell centers just outside the
/// AOI: each edge is snapped to the source spacing and pushed outward by half
/// a source cell. After 2x upsampling the target window starts at
/// `trunc((aoi_edge - (bbox_edge + target / 2)) / target)` on the south and
/// west sides and spans the region's row and column counts.
///
/// # Example
///
/// ```ignore
/// use cdi_grid::Aoi;
/// use cdi_resample::ResamplePlan;
///
/// let aoi = Aoi::new(30.75, 32.20, -25.70, -27.35)?;
/// let plan = ResamplePlan::new(aoi, 0.1, 0.05)?;
/// let region = plan.extract_and_resample(&soil_moisture, &lat, &lon)?;
/// assert_eq!(region.shape(), (34, 30));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResamplePlan {
    aoi: Aoi,
    source_spacing: f64,
    target_spacing: f64,
    bbox: Aoi,
    row_start: usize,
    col_start: usize,
    rows: usize,
    cols: usize,
}

impl ResamplePlan {
    /// Builds the plan for `aoi`.
    ///
    /// # Errors
    ///
    /// Returns [`ResampleError::InvalidSpacing`] for non-positive spacings,
    /// [`ResampleError::SpacingRatio`] unless `source_spacing` is twice
    /// `target_spacing`, or a grid error if the bounding box is degenerate.
    pub fn new(aoi: Aoi, source_spacing: f64, target_spacing: f64) -> Result<Self, ResampleError> {
        for (field, value) in [("source", source_spacing), ("target", target_spacing)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ResampleError::InvalidSpacing { field, value });
            }
        }
        if ((source_spacing / target_spacing) - 2.0).abs() > 1e-9 {
            return Err(ResampleError::SpacingRatio {
                source_spacing,
                target_spacing,
            });
        }

        let bbox = Aoi::new(
            snap_outward(aoi.west(), source_spacing, -1.0),
            snap_outward(aoi.east(), source_spacing, 1.0),
            snap_outward(aoi.north(), source_spacing, 1.0),
            snap_outward(aoi.south(), source_spacing, -1.0),
        )?;

        let half = target_spacing / 2.0;
        let row_start = window_start(aoi.south() - (bbox.south() + half), target_spacing);
        let col_start = window_start(aoi.west() - (bbox.west() + half), target_spacing);
        let rows = aoi.rows(target_spacing);
        let cols = aoi.cols(target_spacing);

        debug!(
            west = bbox.west(),
            east = bbox.east(),
            north = bbox.north(),
            south = bbox.south(),
            row_start,
            col_start,
            rows,
            cols,
            "resample plan"
        );

        Ok(Self {
            aoi,
            source_spacing,
            target_spacing,
            bbox,
            row_start,
            col_start,
            rows,
            cols,
        })
    }

    /// The area of interest.
    pub fn aoi(&self) -> &Aoi {
        &self.aoi
    }

    /// Source cell centers bounding the AOI.
    pub fn bbox(&self) -> &Aoi {
        &self.bbox
    }

    /// Source spacing in degrees.
    pub fn source_spacing(&self) -> f64 {
        self.source_spacing
    }

    /// Target spacing in degrees.
    pub fn target_spacing(&self) -> f64 {
        self.target_spacing
    }

    /// Output shape `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Shape of the source subset covering the bounding box.
    pub fn source_shape(&self) -> (usize, usize) {
        (
            cell_count(self.bbox.north() - self.bbox.south(), self.source_spacing),
            cell_count(self.bbox.east() - self.bbox.west(), self.source_spacing),
        )
    }

    /// Crop window into the upsampled grid (south-up rows).
    pub fn window(&self) -> (Range<usize>, Range<usize>) {
        (
            self.row_start..self.row_start + self.rows,
            self.col_start..self.col_start + self.cols,
        )
    }

    /// Upsamples a south-up source subset covering [`Self::bbox`] and crops
    /// it to the AOI. The result is south-up.
    ///
    /// # Errors
    ///
    /// Returns [`ResampleError::SourceShape`] if `source` does not match
    /// [`Self::source_shape`].
    pub fn resample(&self, source: &Grid) -> Result<Grid, ResampleError> {
        let expected = self.source_shape();
        if source.shape() != expected {
            return Err(ResampleError::SourceShape {
                expected,
                got: source.shape(),
            });
        }
        let upsampled = bilinear_upsample(source);
        let (rows, cols) = self.window();
        Ok(upsampled.crop(rows, cols)?)
    }

    /// Extracts the bounding box from a full source grid, resamples it and
    /// returns the region grid north-up (row 0 is the northern edge).
    ///
    /// # Errors
    ///
    /// Returns [`ResampleError::DescendingLongitude`] for east-to-west
    /// sources, a grid error if the bounding box is not covered by the source
    /// axes, or [`ResampleError::SourceShape`] if the source is not aligned
    /// with the bounding box.
    pub fn extract_and_resample(
        &self,
        grid: &Grid,
        lat: &Axis,
        lon: &Axis,
    ) -> Result<Grid, ResampleError> {
        if !lon.is_ascending() {
            return Err(ResampleError::DescendingLongitude);
        }
        let window = Subgrid::locate(&self.bbox, lat, lon)?;
        let mut raw = window.extract(grid)?;
        if !lat.is_ascending() {
            raw = raw.flip_rows();
        }
        Ok(self.resample(&raw)?.flip_rows())
    }
}

/// Decimal places needed to write `spacing` exactly (up to 9).
fn spacing_decimals(spacing: f64) -> usize {
    (0..=9)
        .find(|&d| {
            let scaled = spacing * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-9
        })
        .unwrap_or(9)
}

/// Snaps `edge` to the source lattice and shifts it half a cell in
/// `direction` (-1 west/south, +1 east/north).
fn snap_outward(edge: f64, spacing: f64, direction: f64) -> f64 {
    let d = spacing_decimals(spacing);
    let unit = (spacing * 10f64.powi(d as i32)).round() == 1.0;
    let snapped = if unit {
        round_decimal(edge, d)
    } else {
        round_decimal(edge / spacing, 0) * spacing
    };
    round_decimal(snapped + direction * spacing / 2.0, d + 1)
}

fn window_start(offset: f64, spacing: f64) -> usize {
    (offset / spacing + COUNT_EPSILON).trunc().max(0.0) as usize
}
