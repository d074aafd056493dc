//! # cdi-io
//!
//! Read and write monthly grid series as NetCDF.
//!
//! Every pipeline stage exchanges one file per output: dimensions `time`,
//! `latitude` and `longitude`, a time axis in days since 1900-01-01, and one
//! or more `f64` data variables whose no-data cells hold `-9999.0`.
//! [`read_series`] accepts common coordinate spellings and either declared
//! missing-value attribute; [`write_series`] writes through a sibling
//! `*.partial` file so a failed stage never leaves a half-written output.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cdi_io::{ReadRequest, SeriesWriter, read_series, write_series};
//!
//! let lst = read_series(path, &ReadRequest::new("lst_delta"))?;
//! let writer = SeriesWriter::new(*lst.latitude(), *lst.longitude())
//!     .with_variable("lst_anom", "K", "LST anomaly", &anomalies)
//!     .with_history("cdi anomaly");
//! write_series(out, &writer)?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `reader` | Read request and grid-series file |
//! | `writer` | Output description and atomic write |
//! | `netcdf_read` | Variable, attribute and time decoding |
//! | `netcdf_write` | File layout |
//! | `error` | Error types |

mod error;
mod netcdf_read;
mod netcdf_write;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::{GridSeriesFile, ReadRequest, read_series};
pub use writer::{OutputVariable, PARTIAL_SUFFIX, SeriesWriter, partial_path, write_series};
