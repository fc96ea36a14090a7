//! Source construction from configuration.
//!
//! Maps a (variable, storage layout) pair onto the atlas's file
//! naming scheme and opens the matching [`WindDataSource`]. Time
//! frames are validated against the configured validity window here,
//! before any grid file is touched.

use std::path::PathBuf;

use atlas_common::{AtlasConfig, GridStorage, TimeFrame, WindVariable};

use crate::error::{GridError, Result};
use crate::pool::{CancelToken, ExtractionLimits};
use crate::remap::RemapTable;
use crate::source::WindDataSource;
use crate::static_mean::StaticMeanGrid;
use crate::time_series::TimeSeriesGrid;

/// Path of the grid file backing one (variable, storage) pair.
///
/// Per-year storage needs the `year`; the multi-year layouts derive
/// their span label from the configured validity window.
pub fn grid_path(
    config: &AtlasConfig,
    storage: GridStorage,
    variable: WindVariable,
    year: Option<i32>,
) -> Result<PathBuf> {
    let code = variable.code();
    let window = config.validity_window.years();
    let (first, last) = (window.start(), window.end());

    let name = match storage {
        GridStorage::TimeSeriesPerYear => {
            let year = year.ok_or_else(|| {
                GridError::InvalidMetadata("per-year storage needs a year".to_string())
            })?;
            format!("{code}.10L.{year}.ts.nc")
        }
        GridStorage::SingleFileMultiyear => format!("{code}.10L.{first}-{last}.nc"),
        GridStorage::HighResMean => format!("D-3km.E5.3arcsecs.{code}.{first}-{last}.nc"),
        GridStorage::CoarseMultiyearMean => format!("D-3km.E5.{code}.{first}-{last}.nc"),
    };

    Ok(config.base_path.join(storage.folder()).join(name))
}

/// Open a wind data source.
///
/// Time-axis layouts require `frame`, which must lie fully inside
/// the configured validity window. Static layouts ignore it.
pub fn open_source(
    config: &AtlasConfig,
    variable: WindVariable,
    storage: GridStorage,
    frame: Option<&TimeFrame>,
    cancel: CancelToken,
) -> Result<Box<dyn WindDataSource>> {
    // The remap table corrects the 3 km axes; the high-resolution
    // layout carries its own, already-correct axes.
    let remap = match &config.remap_csv {
        Some(path) if storage != GridStorage::HighResMean => {
            Some(RemapTable::from_csv_path(path)?)
        }
        _ => None,
    };

    if storage.has_time_axis() {
        let frame = frame
            .copied()
            .ok_or_else(|| GridError::MissingTimeFrame(storage.folder().to_string()))?;
        frame.validate_within(&config.validity_window)?;

        let limits = ExtractionLimits::new(config.workers, config.extraction_deadline);

        tracing::info!(
            variable = %variable,
            storage = ?storage,
            frame = %frame,
            "opening time-series source"
        );

        let source = match storage {
            GridStorage::TimeSeriesPerYear => {
                let files = frame
                    .years()
                    .map(|year| Ok((year, grid_path(config, storage, variable, Some(year))?)))
                    .collect::<Result<Vec<_>>>()?;
                TimeSeriesGrid::per_year(variable, files, frame, limits, cancel, remap)?
            }
            GridStorage::SingleFileMultiyear => {
                let path = grid_path(config, storage, variable, None)?;
                TimeSeriesGrid::single_file(variable, path, frame, limits, cancel, remap)?
            }
            _ => unreachable!("has_time_axis covers exactly the series layouts"),
        };
        Ok(Box::new(source))
    } else {
        let path = grid_path(config, storage, variable, None)?;

        tracing::info!(
            variable = %variable,
            storage = ?storage,
            path = %path.display(),
            "opening static source"
        );

        let source = StaticMeanGrid::open(&path, variable, storage, remap.as_ref())?;
        Ok(Box::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AtlasConfig {
        AtlasConfig {
            base_path: PathBuf::from("/atlas"),
            ..AtlasConfig::default()
        }
    }

    #[test]
    fn test_path_templates() {
        let config = config();

        let path = grid_path(
            &config,
            GridStorage::TimeSeriesPerYear,
            WindVariable::Windspeed,
            Some(2014),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/atlas/TSNC-Format/wspd.10L.2014.ts.nc"));

        let path = grid_path(&config, GridStorage::HighResMean, WindVariable::WeibullA, None)
            .unwrap();
        assert_eq!(
            path,
            PathBuf::from("/atlas/3arcsecs/D-3km.E5.3arcsecs.wbA.2009-2018.nc")
        );

        let path = grid_path(
            &config,
            GridStorage::CoarseMultiyearMean,
            WindVariable::AirDensity,
            None,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/atlas/Statistics/D-3km.E5.rho.2009-2018.nc"));
    }

    #[test]
    fn test_per_year_path_needs_year() {
        let result = grid_path(
            &config(),
            GridStorage::TimeSeriesPerYear,
            WindVariable::Windspeed,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_series_storage_requires_frame() {
        let result = open_source(
            &config(),
            WindVariable::Windspeed,
            GridStorage::TimeSeriesPerYear,
            None,
            CancelToken::new(),
        );
        assert!(matches!(result, Err(GridError::MissingTimeFrame(_))));
    }

    #[test]
    fn test_frame_outside_window_rejected() {
        let frame = TimeFrame::parse("2000", "2005").unwrap();
        let result = open_source(
            &config(),
            WindVariable::Windspeed,
            GridStorage::TimeSeriesPerYear,
            Some(&frame),
            CancelToken::new(),
        );
        assert!(matches!(result, Err(GridError::TimeFrame(_))));
    }
}
