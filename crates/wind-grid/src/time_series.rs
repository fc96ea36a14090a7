//! Time-series grid sources.
//!
//! Per-year storage keeps only the file paths at open time and loads
//! each year's grid inside a pool worker when a point is queried, so
//! memory peaks at one year per worker instead of the whole span.
//! Single-file storage loads its one file per query.

use std::path::PathBuf;

use atlas_common::{GridStorage, InterpolationMethod, TimeFrame, WindVariable};

use crate::error::{GridError, Result};
use crate::netcdf_io;
use crate::pool::{self, CancelToken, ExtractionLimits};
use crate::remap::RemapTable;
use crate::source::{Extraction, ValueSeries, WindDataSource};
use crate::volume::GridVolume;

enum Backing {
    /// Ascending (year, path) pairs, one file per year.
    PerYear(Vec<(i32, PathBuf)>),
    SingleFile(PathBuf),
}

/// Lazily-loaded time-series source for one variable.
pub struct TimeSeriesGrid {
    variable: WindVariable,
    storage: GridStorage,
    frame: TimeFrame,
    limits: ExtractionLimits,
    cancel: CancelToken,
    remap: Option<RemapTable>,
    backing: Backing,
}

impl TimeSeriesGrid {
    /// Open a per-year source. `files` must be sorted ascending by
    /// year; every file must already exist.
    pub fn per_year(
        variable: WindVariable,
        files: Vec<(i32, PathBuf)>,
        frame: TimeFrame,
        limits: ExtractionLimits,
        cancel: CancelToken,
        remap: Option<RemapTable>,
    ) -> Result<Self> {
        for (_, path) in &files {
            if !path.exists() {
                return Err(GridError::MissingFile(path.clone()));
            }
        }
        Ok(Self {
            variable,
            storage: GridStorage::TimeSeriesPerYear,
            frame,
            limits,
            cancel,
            remap,
            backing: Backing::PerYear(files),
        })
    }

    /// Open a single multi-year file source.
    pub fn single_file(
        variable: WindVariable,
        path: PathBuf,
        frame: TimeFrame,
        limits: ExtractionLimits,
        cancel: CancelToken,
        remap: Option<RemapTable>,
    ) -> Result<Self> {
        if !path.exists() {
            return Err(GridError::MissingFile(path));
        }
        Ok(Self {
            variable,
            storage: GridStorage::SingleFileMultiyear,
            frame,
            limits,
            cancel,
            remap,
            backing: Backing::SingleFile(path),
        })
    }

    fn load(&self, path: &PathBuf) -> Result<GridVolume> {
        let mut volume = netcdf_io::load_volume(path, self.variable)?;
        if let Some(remap) = &self.remap {
            volume.assign_axes(remap.xs.clone(), remap.ys.clone())?;
        }
        Ok(volume)
    }

    /// Interpolate one volume and keep only the samples inside the
    /// requested frame.
    fn extract_volume(
        &self,
        volume: &GridVolume,
        x: f64,
        y: f64,
        level: f64,
        method: InterpolationMethod,
    ) -> Result<ValueSeries> {
        let times = volume.times().ok_or_else(|| {
            GridError::InvalidMetadata(format!(
                "'{}' time-series grid has no time axis",
                self.variable
            ))
        })?;
        let values = volume.interpolate(x, y, level, method)?;

        let mut series = ValueSeries::new(Vec::new(), Vec::new());
        for (t, v) in times.iter().zip(values) {
            if self.frame.contains(t.date_naive()) {
                series.times.push(*t);
                series.values.push(v);
            }
        }
        Ok(series)
    }
}

impl WindDataSource for TimeSeriesGrid {
    fn variable(&self) -> WindVariable {
        self.variable
    }

    fn storage(&self) -> GridStorage {
        self.storage
    }

    fn interpolate_point(
        &self,
        x: f64,
        y: f64,
        level: f64,
        method: InterpolationMethod,
    ) -> Result<Extraction> {
        match &self.backing {
            Backing::PerYear(files) => {
                let years: Vec<i32> = files.iter().map(|(year, _)| *year).collect();
                let pieces =
                    pool::extract_years(&years, &self.limits, &self.cancel, |year| {
                        let (_, path) = files
                            .iter()
                            .find(|(y, _)| *y == year)
                            .ok_or_else(|| GridError::MissingFile(PathBuf::from(format!("{year}"))))?;
                        let volume = self.load(path)?;
                        self.extract_volume(&volume, x, y, level, method)
                    })?;

                let mut series = ValueSeries::new(Vec::new(), Vec::new());
                for piece in pieces {
                    series.extend(piece);
                }
                Ok(Extraction::Series(series))
            }
            Backing::SingleFile(path) => {
                let volume = self.load(path)?;
                let series = self.extract_volume(&volume, x, y, level, method)?;
                Ok(Extraction::Series(series))
            }
        }
    }
}
