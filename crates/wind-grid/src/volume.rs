//! In-memory model of one loaded grid.

use atlas_common::{InterpolationMethod, WindVariable};
use chrono::{DateTime, Utc};

use crate::error::{GridError, Result};
use crate::interp;

/// One loaded grid for one variable: bound coordinate axes plus the
/// data cube laid out as `[time][level][y][x]` (time and level
/// collapse to length 1 when absent from the file).
#[derive(Debug, Clone)]
pub struct GridVolume {
    variable: WindVariable,
    xs: Vec<f64>,
    ys: Vec<f64>,
    levels: Vec<f64>,
    times: Option<Vec<DateTime<Utc>>>,
    data: Vec<f32>,
}

impl GridVolume {
    pub fn new(
        variable: WindVariable,
        xs: Vec<f64>,
        ys: Vec<f64>,
        levels: Vec<f64>,
        times: Option<Vec<DateTime<Utc>>>,
        data: Vec<f32>,
    ) -> Result<Self> {
        let nt = times.as_ref().map_or(1, Vec::len);
        let expected = nt * levels.len().max(1) * ys.len() * xs.len();
        if data.len() != expected {
            return Err(GridError::InvalidMetadata(format!(
                "'{variable}' data has {} values, axes imply {expected}",
                data.len()
            )));
        }
        if xs.is_empty() || ys.is_empty() {
            return Err(GridError::InvalidMetadata(format!(
                "'{variable}' grid has an empty x or y axis"
            )));
        }
        Ok(Self {
            variable,
            xs,
            ys,
            levels,
            times,
            data,
        })
    }

    pub fn variable(&self) -> WindVariable {
        self.variable
    }

    pub fn times(&self) -> Option<&[DateTime<Utc>]> {
        self.times.as_deref()
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    fn num_times(&self) -> usize {
        self.times.as_ref().map_or(1, Vec::len)
    }

    fn num_levels(&self) -> usize {
        self.levels.len().max(1)
    }

    fn value(&self, t: usize, l: usize, j: usize, i: usize) -> f64 {
        let nx = self.xs.len();
        let ny = self.ys.len();
        let idx = ((t * self.num_levels() + l) * ny + j) * nx + i;
        self.data[idx] as f64
    }

    /// Reassign the x/y axes from a remap table. The corrected axes
    /// must match the grid's dimensions exactly.
    pub fn assign_axes(&mut self, xs: Vec<f64>, ys: Vec<f64>) -> Result<()> {
        if xs.len() != self.xs.len() {
            return Err(GridError::RemapMismatch {
                axis: "x",
                expected: self.xs.len(),
                found: xs.len(),
            });
        }
        if ys.len() != self.ys.len() {
            return Err(GridError::RemapMismatch {
                axis: "y",
                expected: self.ys.len(),
                found: ys.len(),
            });
        }
        self.xs = xs;
        self.ys = ys;
        Ok(())
    }

    /// Interpolate the volume at planar point (x, y) and the given
    /// hub-height level, one value per time step.
    ///
    /// The level axis uses nearest-level snapping; x and y use the
    /// caller's method. A NaN result is escalated to
    /// [`GridError::ExtrapolatedNan`] rather than returned.
    pub fn interpolate(
        &self,
        x: f64,
        y: f64,
        level: f64,
        method: InterpolationMethod,
    ) -> Result<Vec<f64>> {
        let l = if self.levels.is_empty() {
            0
        } else {
            interp::nearest_index(&self.levels, level)
        };

        let mut out = Vec::with_capacity(self.num_times());
        for t in 0..self.num_times() {
            let v = interp::interp_plane(
                &self.xs,
                &self.ys,
                |j, i| self.value(t, l, j, i),
                x,
                y,
                method,
            );
            if v.is_nan() {
                return Err(GridError::ExtrapolatedNan {
                    variable: self.variable,
                    x,
                    y,
                });
            }
            out.push(v);
        }
        Ok(out)
    }
}
