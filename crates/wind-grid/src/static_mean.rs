//! Static climatological mean sources.
//!
//! The high-resolution and coarse statistics layouts hold one
//! time-invariant field per variable, small enough to load eagerly
//! at open time and answer every query from memory.

use std::path::Path;

use atlas_common::{GridStorage, InterpolationMethod, WindVariable};

use crate::error::{GridError, Result};
use crate::netcdf_io;
use crate::remap::RemapTable;
use crate::source::{Extraction, WindDataSource};
use crate::volume::GridVolume;

pub struct StaticMeanGrid {
    variable: WindVariable,
    storage: GridStorage,
    volume: GridVolume,
}

impl StaticMeanGrid {
    pub fn open(
        path: &Path,
        variable: WindVariable,
        storage: GridStorage,
        remap: Option<&RemapTable>,
    ) -> Result<Self> {
        debug_assert!(!storage.has_time_axis());

        let mut volume = netcdf_io::load_volume(path, variable)?;
        if let Some(remap) = remap {
            volume.assign_axes(remap.xs.clone(), remap.ys.clone())?;
        }
        Ok(Self {
            variable,
            storage,
            volume,
        })
    }
}

impl WindDataSource for StaticMeanGrid {
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
        let values = self.volume.interpolate(x, y, level, method)?;
        match values.as_slice() {
            [value] => Ok(Extraction::Scalar(*value)),
            _ => Err(GridError::InvalidMetadata(format!(
                "'{}' static grid returned {} values per point",
                self.variable,
                values.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::write_grid_nc;

    fn mean_grid(dir: &Path) -> StaticMeanGrid {
        let xs = [0.0, 100.0, 200.0];
        let ys = [0.0, 100.0, 200.0];
        // value = j*10 + i, no level or time axis
        let data: Vec<f32> = (0..3)
            .flat_map(|j| (0..3).map(move |i| (j * 10 + i) as f32))
            .collect();

        let path = dir.join("wbA.nc");
        write_grid_nc(&path, WindVariable::WeibullA, &xs, &ys, &[], None, &data).unwrap();
        StaticMeanGrid::open(&path, WindVariable::WeibullA, GridStorage::HighResMean, None)
            .unwrap()
    }

    #[test]
    fn test_scalar_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let grid = mean_grid(dir.path());

        let extraction = grid
            .interpolate_point(100.0, 100.0, 0.0, InterpolationMethod::Linear)
            .unwrap();
        assert_eq!(extraction.as_scalar(), Some(11.0));
        assert!(extraction.as_series().is_none());
    }

    #[test]
    fn test_midpoint_is_bilinear() {
        let dir = tempfile::tempdir().unwrap();
        let grid = mean_grid(dir.path());

        let extraction = grid
            .interpolate_point(50.0, 50.0, 0.0, InterpolationMethod::Linear)
            .unwrap();
        assert!((extraction.as_scalar().unwrap() - 5.5).abs() < 1e-9);
    }
}
