//! # cdi-stats
//!
//! Per-cell statistics over month slices.
//!
//! A month slice is the list of grids sharing one month of year, one per
//! year in ascending order. Both engines here work cell by cell over the
//! years whose value is not the [`cdi_grid::MISSING`] sentinel:
//!
//! - [`anomalies`] standardizes each value against the cell's mean and
//!   sample standard deviation (used for land surface temperature).
//! - [`percentile_ranks`] gives each value its tie-aware mean rank, scaled
//!   onto `[0, 1]` (used for every indicator before compositing).
//!
//! The `*_by_month` variants split an [`cdi_grid::IndicatorSeries`] into its
//! twelve slices, run the engine on each and restore chronological order.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cdi_stats::{anomalies_by_month, ranks_by_month};
//!
//! let lst_anomaly = anomalies_by_month(&lst)?;
//! let lst_rank = ranks_by_month(&lst_anomaly)?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `moments` | Mean, variance and standard deviation |
//! | `anomaly` | Standardized anomalies |
//! | `rank` | Percentile ranks |
//! | `error` | Error types |

mod anomaly;
mod error;
mod moments;
mod rank;

pub use anomaly::{anomalies, anomalies_by_month};
pub use error::StatsError;
pub use moments::{mean, sd, variance};
pub use rank::{RANK_DECIMALS, percentile_ranks, ranks_by_month};
