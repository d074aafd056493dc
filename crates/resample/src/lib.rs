//! Missing-aware bilinear resampling onto the region grid.
//!
//! Coarse products (0.1 degree soil moisture, for example) are brought onto
//! the 0.05 degree region grid by splitting every source cell into four.
//! Each target cell is a 9-3-3-1 weighted blend of the surrounding 2x2 source
//! block; missing source cells drop out of the weights instead of dragging
//! the value toward the sentinel.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌─────────────────┐     ┌──────────────┐     ┌──────────┐
//!  │ Index mapper  │────▶│ 2x upsample      │────▶│ AOI crop      │────▶│ north-up │
//!  │ (bbox subset) │     │ (+4 cell padding)│     │ (trunc start) │     │ flip     │
//!  └──────────────┘     └─────────────────┘     └──────────────┘     └──────────┘
//! ```
//!
//! # Quick start
//!
//! ```ignore
//! use cdi_grid::Aoi;
//! use cdi_resample::ResamplePlan;
//!
//! let aoi = Aoi::new(30.75, 32.20, -25.70, -27.35)?;
//! let plan = ResamplePlan::new(aoi, 0.1, 0.05)?;
//! let region = plan.extract_and_resample(&grid, &lat, &lon)?;
//! ```

mod bilinear;
mod error;
mod plan;

pub use bilinear::{KERNELS, PADDING, bilinear_upsample, interpolate_cell};
pub use error::ResampleError;
pub use plan::ResamplePlan;
