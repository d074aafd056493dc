//! Error types for cdi-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the cdi-io crate.
///
/// Covers file-system failures, errors from the NetCDF library, and
/// mismatches between a file's layout and the grid series it should hold.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Returned when a file-system operation fails.
    #[error("i/o error on {}: {source}", path.display())]
    FileSystem {
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Returned when a required variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a dimension has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when a data variable is neither 2-D nor 3-D.
    #[error("variable '{name}' has {rank} dimensions, expected 2 or 3")]
    UnsupportedRank {
        /// Variable name.
        name: String,
        /// Number of dimensions found.
        rank: usize,
    },

    /// Returned when a time value or its units cannot be interpreted.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time parsing issue.
        reason: String,
    },

    /// Returned when a writer request is inconsistent.
    #[error("invalid output: {reason}")]
    InvalidOutput {
        /// Description of the problem.
        reason: String,
    },

    /// Grid error.
    #[error(transparent)]
    Grid(#[from] cdi_grid::GridError),

    /// Calendar error.
    #[error(transparent)]
    Calendar(#[from] cdi_calendar::CalendarError),
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.nc"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.nc");
    }

    #[test]
    fn display_netcdf() {
        let err = IoError::Netcdf {
            reason: "bad header".to_string(),
        };
        assert_eq!(err.to_string(), "netcdf error: bad header");
    }

    #[test]
    fn display_file_system() {
        let err = IoError::FileSystem {
            path: PathBuf::from("/out/cdi.nc"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "i/o error on /out/cdi.nc: denied");
    }

    #[test]
    fn display_missing_variable() {
        let err = IoError::MissingVariable {
            name: "lst_delta".to_string(),
            path: PathBuf::from("/data/lst.nc"),
        };
        assert_eq!(
            err.to_string(),
            "variable 'lst_delta' not found in /data/lst.nc"
        );
    }

    #[test]
    fn display_dimension_mismatch() {
        let err = IoError::DimensionMismatch {
            name: "latitude".to_string(),
            expected: 34,
            got: 35,
        };
        assert_eq!(
            err.to_string(),
            "dimension 'latitude' mismatch: expected 34, got 35"
        );
    }

    #[test]
    fn display_unsupported_rank() {
        let err = IoError::UnsupportedRank {
            name: "precip".to_string(),
            rank: 4,
        };
        assert_eq!(
            err.to_string(),
            "variable 'precip' has 4 dimensions, expected 2 or 3"
        );
    }

    #[test]
    fn display_invalid_time() {
        let err = IoError::InvalidTime {
            reason: "negative offset".to_string(),
        };
        assert_eq!(err.to_string(), "invalid time: negative offset");
    }

    #[test]
    fn from_netcdf_error() {
        let nc_err = netcdf::Error::Str("test nc error".to_string());
        let err: IoError = nc_err.into();
        assert!(matches!(err, IoError::Netcdf { .. }));
        assert!(err.to_string().contains("test nc error"));
    }

    #[test]
    fn from_calendar_error() {
        let cal_err = cdi_calendar::CalendarError::InvalidMonth { month: 13 };
        let err: IoError = cal_err.into();
        assert!(matches!(err, IoError::Calendar(_)));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
