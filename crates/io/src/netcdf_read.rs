//! NetCDF access below the grid-series reader: coordinates, data and time.

use std::path::Path;

use cdi_calendar::{CalendarKey, EPOCH};
use chrono::NaiveDate;
use netcdf::AttributeValue;

use crate::error::IoError;

/// Calendars whose day arithmetic matches chrono's proleptic Gregorian.
const GREGORIAN_CALENDARS: [&str; 3] = ["proleptic_gregorian", "gregorian", "standard"];

/// Opens `path`; a path that does not exist is [`IoError::FileNotFound`].
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// First of `aliases` present in the file, read as a 1-D `f64` vector.
///
/// Returns the name that matched together with the data. If none match,
/// reports [`IoError::MissingVariable`] under the first alias.
pub(crate) fn read_1d_f64(
    file: &netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<(String, Vec<f64>), IoError> {
    for &alias in aliases {
        if let Some(var) = file.variable(alias) {
            return Ok((alias.to_string(), var.get_values::<f64, _>(..)?));
        }
    }

    let name = aliases.first().copied().unwrap_or("coordinate");
    Err(IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// A data variable read in full.
pub(crate) struct RawVariable {
    /// Flattened values in `[time, lat, lon]` order.
    pub data: Vec<f64>,
    /// Time steps (1 for a 2-D variable).
    pub nt: usize,
    /// Rows.
    pub ny: usize,
    /// Columns.
    pub nx: usize,
    /// Whether the variable has a time dimension.
    pub has_time: bool,
    /// `missing_value`, else `_FillValue`, if declared.
    pub missing_value: Option<f64>,
    /// `units` attribute.
    pub units: Option<String>,
    /// `long_name` attribute.
    pub long_name: Option<String>,
}

/// Read a 2-D `(lat, lon)` or 3-D `(time, lat, lon)` `f64` variable with
/// its descriptive attributes.
pub(crate) fn read_grid_variable(
    file: &netcdf::File,
    var_name: &str,
    path: &Path,
) -> Result<RawVariable, IoError> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| IoError::MissingVariable {
            name: var_name.to_string(),
            path: path.to_path_buf(),
        })?;

    let dims = var.dimensions();
    let (nt, ny, nx, has_time) = match dims.len() {
        3 => (dims[0].len(), dims[1].len(), dims[2].len(), true),
        2 => (1, dims[0].len(), dims[1].len(), false),
        rank => {
            return Err(IoError::UnsupportedRank {
                name: var_name.to_string(),
                rank,
            });
        }
    };

    let missing_value = ["missing_value", "_FillValue"]
        .iter()
        .find_map(|&name| var.attribute_value(name).and_then(|r| r.ok()).and_then(attr_f64));
    let units = var
        .attribute_value("units")
        .and_then(|r| r.ok())
        .and_then(attr_string);
    let long_name = var
        .attribute_value("long_name")
        .and_then(|r| r.ok())
        .and_then(attr_string);

    let data = var.get_values::<f64, _>(..)?;
    Ok(RawVariable {
        data,
        nt,
        ny,
        nx,
        has_time,
        missing_value,
        units,
        long_name,
    })
}

/// Numeric attribute as `f64` (first element for arrays).
pub(crate) fn attr_f64(value: AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| f64::from(x)),
        _ => None,
    }
}

fn attr_string(value: AttributeValue) -> Option<String> {
    match value {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// Whether `value` equals the declared missing value, also when either side
/// went through `f32` storage.
pub(crate) fn matches_missing(value: f64, missing: f64) -> bool {
    value == missing || (value as f32) == (missing as f32)
}

/// Base date of the time variable, from its `units` and `calendar`.
///
/// Accepts CF strings such as `"days since YYYY-MM-DD"` and
/// `"days since YYYY-MM-DD HH:MM:SS"` and returns the base date. Only day
/// units and Gregorian calendars are accepted.
pub(crate) fn read_time_units(
    file: &netcdf::File,
    time_var: &str,
    path: &Path,
) -> Result<NaiveDate, IoError> {
    let var = file
        .variable(time_var)
        .ok_or_else(|| IoError::MissingVariable {
            name: time_var.to_string(),
            path: path.to_path_buf(),
        })?;

    let units: String = var
        .attribute_value("units")
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("time variable '{time_var}' has no 'units' attribute"),
        })?
        .map_err(|e| IoError::InvalidTime {
            reason: format!("failed to read 'units' attribute: {e}"),
        })?
        .try_into()
        .map_err(|e: netcdf::Error| IoError::InvalidTime {
            reason: format!("'units' attribute is not a string: {e}"),
        })?;

    let calendar = var
        .attribute_value("calendar")
        .and_then(|res| res.ok())
        .and_then(attr_string);
    if let Some(cal) = &calendar
        && !GREGORIAN_CALENDARS.contains(&cal.as_str())
    {
        return Err(IoError::InvalidTime {
            reason: format!("unsupported calendar '{cal}'"),
        });
    }

    parse_time_units(&units)
}

/// Base date of a `"days since ..."` units string.
pub(crate) fn parse_time_units(units: &str) -> Result<NaiveDate, IoError> {
    let parts: Vec<&str> = units.trim().splitn(3, ' ').collect();
    if parts.len() < 3 || parts[0] != "days" || parts[1] != "since" {
        return Err(IoError::InvalidTime {
            reason: format!("unexpected time units format: '{units}'"),
        });
    }

    // A trailing clock time is ignored.
    let date_str = parts[2].get(..10).unwrap_or(parts[2]);
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| IoError::InvalidTime {
        reason: format!("failed to parse base date '{date_str}': {e}"),
    })
}

/// Convert day offsets from `base_date` into calendar keys.
///
/// Fractional days are truncated; each offset maps to the month containing
/// the resulting date.
pub(crate) fn time_offsets_to_keys(
    base_date: NaiveDate,
    offsets: &[f64],
) -> Result<Vec<CalendarKey>, IoError> {
    let shift = base_date.signed_duration_since(EPOCH).num_days();
    offsets
        .iter()
        .map(|&offset| {
            if !offset.is_finite() {
                return Err(IoError::InvalidTime {
                    reason: format!("non-finite time offset {offset}"),
                });
            }
            Ok(CalendarKey::from_day_offset(shift + offset.trunc() as i64)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(y: i32, m: u8) -> CalendarKey {
        CalendarKey::new(y, m).unwrap()
    }

    #[test]
    fn parse_units_with_time_of_day() {
        let base = parse_time_units("days since 1900-01-01 00:00:00.0 UTC").unwrap();
        assert_eq!(base, EPOCH);
        let base = parse_time_units("days since 1981-01-01").unwrap();
        assert_eq!(base, NaiveDate::from_ymd_opt(1981, 1, 1).unwrap());
    }

    #[test]
    fn parse_units_rejects_hours() {
        assert!(parse_time_units("hours since 1900-01-01").is_err());
        assert!(parse_time_units("days").is_err());
    }

    #[test]
    fn offsets_from_epoch() {
        let keys = time_offsets_to_keys(EPOCH, &[0.0, 36524.0, 36555.0]).unwrap();
        assert_eq!(keys, vec![key(1900, 1), key(2000, 1), key(2000, 2)]);
    }

    #[test]
    fn offsets_from_other_base() {
        let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        // Mid-month and fractional offsets land in the containing month.
        let keys = time_offsets_to_keys(base, &[0.0, 45.5, 366.0]).unwrap();
        assert_eq!(keys, vec![key(2000, 1), key(2000, 2), key(2001, 1)]);
    }

    #[test]
    fn non_finite_offset_rejected() {
        assert!(time_offsets_to_keys(EPOCH, &[f64::NAN]).is_err());
    }

    #[test]
    fn missing_value_matching() {
        assert!(matches_missing(-9999.0, -9999.0));
        assert!(matches_missing(f64::from(1e20f32), 1e20));
        assert!(!matches_missing(0.0, -9999.0));
    }

    #[test]
    fn numeric_attributes() {
        assert_eq!(attr_f64(AttributeValue::Float(-9999.0)), Some(-9999.0));
        assert_eq!(attr_f64(AttributeValue::Short(-1)), Some(-1.0));
        assert_eq!(attr_f64(AttributeValue::Str("x".into())), None);
    }
}
