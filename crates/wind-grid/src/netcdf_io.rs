//! NetCDF grid file reading.
//!
//! Atlas grids expose dimensions `x`, `y`, optionally `level` and
//! optionally `time` (in that order, fastest-varying last), plus a
//! data variable named by the wind-variable code. Coordinate
//! variables carry the axis values; `time` follows the CF
//! "unit since epoch" convention.

use std::path::Path;

use atlas_common::WindVariable;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{GridError, Result};
use crate::volume::GridVolume;

/// Load one grid file into memory.
pub fn load_volume(path: &Path, variable: WindVariable) -> Result<GridVolume> {
    if !path.exists() {
        return Err(GridError::MissingFile(path.to_path_buf()));
    }

    let file = netcdf::open(path).map_err(|e| GridError::OpenFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let xs = read_axis(&file, "x")?;
    let ys = read_axis(&file, "y")?;

    let levels = if file.dimension("level").is_some() {
        read_axis(&file, "level")?
    } else {
        Vec::new()
    };

    let times = if file.dimension("time").is_some() {
        Some(read_times(&file)?)
    } else {
        None
    };

    let var = file
        .variable(variable.code())
        .ok_or_else(|| GridError::InvalidMetadata(format!("missing variable '{variable}'")))?;

    let raw: Vec<f32> = var
        .get_values(..)
        .map_err(|e| GridError::ReadFailed {
            variable: variable.code().to_string(),
            message: e.to_string(),
        })?;

    // Replace the fill value with NaN so extraction treats missing
    // cells like out-of-coverage data.
    let data = match get_f64_attr(&var, "_FillValue") {
        Some(fill) => raw
            .iter()
            .map(|&v| if (v as f64) == fill { f32::NAN } else { v })
            .collect(),
        None => raw,
    };

    tracing::debug!(
        path = %path.display(),
        variable = %variable,
        nx = xs.len(),
        ny = ys.len(),
        "loaded grid volume"
    );

    GridVolume::new(variable, xs, ys, levels, times, data)
}

fn read_axis(file: &netcdf::File, name: &str) -> Result<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| GridError::InvalidMetadata(format!("missing coordinate variable '{name}'")))?;

    var.get_values(..).map_err(|e| GridError::ReadFailed {
        variable: name.to_string(),
        message: e.to_string(),
    })
}

fn read_times(file: &netcdf::File) -> Result<Vec<DateTime<Utc>>> {
    let var = file
        .variable("time")
        .ok_or_else(|| GridError::InvalidMetadata("missing coordinate variable 'time'".to_string()))?;

    let raw: Vec<f64> = var.get_values(..).map_err(|e| GridError::ReadFailed {
        variable: "time".to_string(),
        message: e.to_string(),
    })?;

    let units = get_str_attr(&var, "units")
        .unwrap_or_else(|| "seconds since 1970-01-01 00:00:00".to_string());
    let (seconds_per_unit, epoch) = parse_time_units(&units)?;

    Ok(raw
        .iter()
        .map(|&v| epoch + chrono::Duration::seconds((v * seconds_per_unit) as i64))
        .collect())
}

/// Parse a CF time units string like "hours since 2009-01-01 00:00:00".
fn parse_time_units(units: &str) -> Result<(f64, DateTime<Utc>)> {
    let invalid = || GridError::InvalidMetadata(format!("unsupported time units '{units}'"));

    let mut parts = units.splitn(3, ' ');
    let unit = parts.next().ok_or_else(invalid)?;
    let since = parts.next().ok_or_else(invalid)?;
    let stamp = parts.next().ok_or_else(invalid)?;

    if since != "since" {
        return Err(invalid());
    }

    let seconds_per_unit = match unit {
        "seconds" | "second" => 1.0,
        "minutes" | "minute" => 60.0,
        "hours" | "hour" => 3600.0,
        "days" | "day" => 86400.0,
        _ => return Err(invalid()),
    };

    let stamp = stamp.trim().replace('T', " ");
    let naive: NaiveDateTime =
        if let Ok(dt) = NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%d %H:%M:%S") {
            dt
        } else if let Ok(date) = NaiveDate::parse_from_str(&stamp, "%Y-%m-%d") {
            date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?
        } else {
            return Err(invalid());
        };

    Ok((seconds_per_unit, Utc.from_utc_datetime(&naive)))
}

/// Check for an attribute before reading it, avoiding HDF5 stderr
/// spam on missing attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_str_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let value = var.attribute_value(name)?.ok()?;
    f64::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_units() {
        let (scale, epoch) = parse_time_units("hours since 2009-01-01 00:00:00").unwrap();
        assert_eq!(scale, 3600.0);
        assert_eq!(epoch, Utc.with_ymd_and_hms(2009, 1, 1, 0, 0, 0).unwrap());

        let (scale, epoch) = parse_time_units("days since 1970-01-01").unwrap();
        assert_eq!(scale, 86400.0);
        assert_eq!(epoch, Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_bad_time_units_rejected() {
        assert!(parse_time_units("fortnights since 2009-01-01").is_err());
        assert!(parse_time_units("hours until 2009-01-01").is_err());
        assert!(parse_time_units("hours").is_err());
    }
}
