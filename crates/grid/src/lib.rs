//! # cdi-grid
//!
//! Grid data model for monthly climate indicators.
//!
//! A [`Grid`] is a row-major `f64` raster whose no-data cells hold exactly
//! [`MISSING`] (`-9999.0`). [`Axis`] describes fixed-spacing cell centers,
//! [`Aoi`] the target rectangle, and [`Subgrid::locate`] maps the rectangle
//! onto index ranges of a larger source grid. [`IndicatorSeries`] keys grids
//! by [`cdi_calendar::CalendarKey`] and runs month-of-year engines over them.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `grid` | Sentinel-masked grid |
//! | `axis` | Coordinate axes and 3-decimal rounding |
//! | `aoi` | Area of interest and region axes |
//! | `subgrid` | Grid index mapper |
//! | `series` | Calendar-keyed grid series and month-slice mapping |
//! | `blend` | Depth-weighted layer blending |
//! | `error` | Error types |

mod aoi;
mod axis;
mod blend;
mod error;
mod grid;
mod series;
mod subgrid;

pub use aoi::{Aoi, COUNT_EPSILON, cell_count};
pub use axis::{Axis, COORD_DECIMALS, round_coord, round_decimal, round_to};
pub use blend::{BLEND_DECIMALS, blend};
pub use error::GridError;
pub use grid::{Grid, MISSING, is_missing};
pub use series::IndicatorSeries;
pub use subgrid::{Subgrid, index_range};
