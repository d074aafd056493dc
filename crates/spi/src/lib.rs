//! # cdi-spi
//!
//! Standardized Precipitation Index for monthly precipitation grids.
//!
//! Monthly totals are first accumulated over a totaling period (1, 3, 9
//! months, ...) with [`period_totals`]. Then, per month of year and per
//! cell, a zero-inflated gamma distribution ([`GammaFit`]) is fitted to the
//! yearly totals and every total is mapped through the fitted cumulative
//! probability onto the standard normal scale.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["monthly precip"] -->|"period_totals()"| B["N-month totals"]
//!     B -->|"spi_by_month()"| C["month slices"]
//!     C -->|"GammaFit::fit()"| D["alpha, beta, q"]
//!     D -->|"probit(H(x))"| E["SPI series"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use cdi_spi::{period_totals, spi_by_month};
//!
//! let totals = period_totals(&precip, 3)?;
//! let spi3 = spi_by_month(&totals)?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `totals` | Rolling multi-month totals |
//! | `gamma` | Thom gamma estimator with zero mass |
//! | `spi` | Per-slice SPI |
//! | `error` | Error types |

mod error;
mod gamma;
mod spi;
mod totals;

pub use error::SpiError;
pub use gamma::{GammaFit, MIN_A, MIN_BETA};
pub use spi::{spi, spi_by_month};
pub use totals::period_totals;
