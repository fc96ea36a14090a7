//! The built 2-D power table and its builder.

use std::path::Path;

use atlas_common::InterpolationMethod;
use serde::{Deserialize, Serialize};

use crate::error::{PowerCurveError, Result};
use crate::raw::RawPowerCurve;
use crate::regrid;

/// Standard air density at sea level, the reference column for
/// single-density curve expansion.
pub const REFERENCE_DENSITY: f64 = 1.225;

/// Decimal places the axes are rounded to after regridding. Without
/// this rounding, exact-match lookups fail on floating-point drift
/// introduced by the interpolation.
const WINDSPEED_DECIMALS: u32 = 3;
const DENSITY_DECIMALS: u32 = 4;

/// Regridding parameters for [`PowerCurveTable::build`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerCurveBuilder {
    /// Step of the fine windspeed axis, in m/s.
    pub increment_windspeed: f64,
    /// Step of the fine air-density axis, in kg/m³.
    pub increment_air_density: f64,
    /// Clamp built powers to `[0, max(raw)]`, correcting cubic
    /// overshoot around the rated-power plateau.
    pub power_limiter: bool,
    /// Prepend zero-power rows below the raw curve's minimum
    /// windspeed, down to 0, modelling the no-power regime below
    /// cut-in.
    pub extend_to_zero: bool,
}

impl Default for PowerCurveBuilder {
    fn default() -> Self {
        Self {
            increment_windspeed: 0.01,
            increment_air_density: 0.001,
            power_limiter: true,
            extend_to_zero: true,
        }
    }
}

/// Immutable 2-D power lookup over (windspeed, air density).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerCurveTable {
    windspeeds: Vec<f64>,
    densities: Vec<f64>,
    /// Row-major `[windspeed][density]`, in kW.
    powers: Vec<f64>,
}

impl PowerCurveBuilder {
    pub fn build(&self, raw: &RawPowerCurve) -> Result<PowerCurveTable> {
        if self.increment_windspeed <= 0.0 {
            return Err(PowerCurveError::InvalidIncrement(self.increment_windspeed));
        }
        if self.increment_air_density <= 0.0 {
            return Err(PowerCurveError::InvalidIncrement(self.increment_air_density));
        }

        let raw_wspd = raw.windspeeds();
        let raw_rho = raw.densities();

        let mut windspeeds = fine_axis(
            raw_wspd[0],
            raw_wspd[raw_wspd.len() - 1],
            self.increment_windspeed,
            WINDSPEED_DECIMALS,
        );
        let densities = if raw_rho.len() == 1 {
            raw_rho.to_vec()
        } else {
            fine_axis(
                raw_rho[0],
                raw_rho[raw_rho.len() - 1],
                self.increment_air_density,
                DENSITY_DECIMALS,
            )
        };

        // Separable regrid: first along windspeed per raw density
        // column, then along density per fine windspeed row.
        let mut along_wspd = Vec::with_capacity(windspeeds.len() * raw_rho.len());
        for c in 0..raw_rho.len() {
            along_wspd.push(regrid::resample(raw_wspd, &raw.column(c), &windspeeds));
        }

        let mut powers = Vec::with_capacity(windspeeds.len() * densities.len());
        for w in 0..windspeeds.len() {
            let row: Vec<f64> = (0..raw_rho.len()).map(|c| along_wspd[c][w]).collect();
            powers.extend(regrid::resample(raw_rho, &row, &densities));
        }

        if self.power_limiter {
            let max_raw = raw.max_power();
            for p in &mut powers {
                *p = p.clamp(0.0, max_raw);
            }
        }

        if self.extend_to_zero && windspeeds[0] > 0.0 {
            let mut prefix = Vec::new();
            let mut i = 0usize;
            loop {
                let v = round_to(
                    i as f64 * self.increment_windspeed,
                    WINDSPEED_DECIMALS,
                );
                if v >= windspeeds[0] {
                    break;
                }
                prefix.push(v);
                i += 1;
            }
            let mut extended = vec![0.0; prefix.len() * densities.len()];
            extended.append(&mut powers);
            powers = extended;
            prefix.append(&mut windspeeds);
            windspeeds = prefix;
        }

        tracing::debug!(
            windspeeds = windspeeds.len(),
            densities = densities.len(),
            "built power curve table"
        );

        Ok(PowerCurveTable {
            windspeeds,
            densities,
            powers,
        })
    }
}

impl PowerCurveTable {
    pub fn windspeeds(&self) -> &[f64] {
        &self.windspeeds
    }

    pub fn densities(&self) -> &[f64] {
        &self.densities
    }

    fn value(&self, w: usize, c: usize) -> f64 {
        self.powers[w * self.densities.len() + c]
    }

    /// Elementwise power lookup; both slices must be equal length.
    pub fn get_power(
        &self,
        windspeeds: &[f64],
        densities: &[f64],
        method: InterpolationMethod,
    ) -> Result<Vec<f64>> {
        if windspeeds.len() != densities.len() {
            return Err(PowerCurveError::LengthMismatch {
                windspeeds: windspeeds.len(),
                densities: densities.len(),
            });
        }
        windspeeds
            .iter()
            .zip(densities)
            .map(|(&v, &rho)| self.lookup(v, rho, method))
            .collect()
    }

    /// Single-cell power lookup, linear in both axes.
    pub fn power_at(&self, windspeed: f64, density: f64) -> Result<f64> {
        self.lookup(windspeed, density, InterpolationMethod::Linear)
    }

    fn lookup(&self, windspeed: f64, density: f64, method: InterpolationMethod) -> Result<f64> {
        match method {
            InterpolationMethod::Nearest => {
                let w = nearest(&self.windspeeds, windspeed);
                let c = nearest(&self.densities, density);
                Ok(self.value(w, c))
            }
            InterpolationMethod::Linear => {
                let (w0, w1, tw) = bracket(&self.windspeeds, windspeed, "windspeed")?;
                let (c0, c1, tc) = bracket(&self.densities, density, "air density")?;
                let low = self.value(w0, c0) * (1.0 - tc) + self.value(w0, c1) * tc;
                let high = self.value(w1, c0) * (1.0 - tc) + self.value(w1, c1) * tc;
                Ok(low * (1.0 - tw) + high * tw)
            }
            other => Err(PowerCurveError::UnsupportedLookup(other)),
        }
    }

    /// Expand a single-density table to a full 2-D surface by
    /// scaling the reference table's relative density sensitivity
    /// onto this curve's absolute values:
    /// `target(rho) = reference(rho) / reference(1.225) * target(1.225)`.
    ///
    /// This assumes all turbines share the reference curve's density
    /// sensitivity, an approximation rather than physics.
    pub fn expand_single_density(&self, reference: &PowerCurveTable) -> Result<PowerCurveTable> {
        if self.densities.len() != 1 {
            return Err(PowerCurveError::NotSingleDensity(self.densities.len()));
        }

        let densities = reference.densities.to_vec();
        let mut powers = Vec::with_capacity(self.windspeeds.len() * densities.len());
        for (w, &v) in self.windspeeds.iter().enumerate() {
            let base = self.value(w, 0);
            let at_standard = reference.power_at(v, REFERENCE_DENSITY)?;
            for &rho in &densities {
                if at_standard == 0.0 {
                    powers.push(0.0);
                    continue;
                }
                let at_rho = reference.power_at(v, rho)?;
                powers.push(at_rho / at_standard * base);
            }
        }

        Ok(PowerCurveTable {
            windspeeds: self.windspeeds.clone(),
            densities,
            powers,
        })
    }

    /// Write the table as a semicolon-separated CSV, same shape as
    /// the raw input format.
    pub fn write_csv_path(&self, path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;

        let mut header = vec!["wspd".to_string()];
        header.extend(self.densities.iter().map(|rho| rho.to_string()));
        writer.write_record(&header)?;

        for (w, v) in self.windspeeds.iter().enumerate() {
            let mut record = vec![v.to_string()];
            record.extend((0..self.densities.len()).map(|c| self.value(w, c).to_string()));
            writer.write_record(&record)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Regular axis from `start` to `end` inclusive, rounded per cell.
fn fine_axis(start: f64, end: f64, increment: f64, decimals: u32) -> Vec<f64> {
    let mut axis = Vec::new();
    let mut i = 0usize;
    loop {
        let v = start + i as f64 * increment;
        if v > end + increment * 1e-6 {
            break;
        }
        axis.push(round_to(v, decimals));
        i += 1;
    }
    axis
}

fn nearest(axis: &[f64], target: f64) -> usize {
    let hi = axis.partition_point(|&a| a <= target);
    if hi == 0 {
        return 0;
    }
    if hi >= axis.len() {
        return axis.len() - 1;
    }
    let lo = hi - 1;
    if (target - axis[lo]).abs() <= (axis[hi] - target).abs() {
        lo
    } else {
        hi
    }
}

/// Bracketing cell and fraction for a linear lookup; values outside
/// the axis extents are a fatal miss.
fn bracket(axis: &[f64], target: f64, name: &'static str) -> Result<(usize, usize, f64)> {
    if axis.len() == 1 {
        return Ok((0, 0, 0.0));
    }

    let eps = 1e-9;
    if target < axis[0] - eps || target > axis[axis.len() - 1] + eps {
        return Err(PowerCurveError::OutOfRange {
            axis: name,
            value: target,
        });
    }

    let t = target.clamp(axis[0], axis[axis.len() - 1]);
    let hi = axis.partition_point(|&a| a <= t).min(axis.len() - 1);
    let lo = hi.saturating_sub(1).min(axis.len() - 2);
    let hi = lo + 1;
    let frac = (t - axis[lo]) / (axis[hi] - axis[lo]);
    Ok((lo, hi, frac))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_curve() -> RawPowerCurve {
        // power(v, rho) = 100 * v * rho / 1.225, linear in both axes
        // so the regridded values are exactly predictable.
        let densities = [1.125, 1.225, 1.325];
        let mut csv = String::from("wspd;1.125;1.225;1.325\n");
        for v in 2..=6 {
            csv.push_str(&format!("{v}.0"));
            for rho in densities {
                csv.push_str(&format!(";{}", 100.0 * v as f64 * rho / 1.225));
            }
            csv.push('\n');
        }
        RawPowerCurve::from_reader(csv.as_bytes()).unwrap()
    }

    fn builder() -> PowerCurveBuilder {
        PowerCurveBuilder {
            increment_windspeed: 0.5,
            increment_air_density: 0.05,
            power_limiter: true,
            extend_to_zero: true,
        }
    }

    #[test]
    fn test_clamp_bounds_every_cell() {
        let raw = raw_curve();
        let table = builder().build(&raw).unwrap();
        let max_raw = raw.max_power();
        for &p in &table.powers {
            assert!((0.0..=max_raw).contains(&p), "power {p} out of bounds");
        }
    }

    #[test]
    fn test_zero_extension_below_cut_in() {
        let table = builder().build(&raw_curve()).unwrap();
        assert_eq!(table.windspeeds()[0], 0.0);
        for &v in table.windspeeds().iter().filter(|&&v| v < 2.0) {
            let p = table.power_at(v, 1.225).unwrap();
            assert_eq!(p, 0.0, "expected zero power at {v} m/s");
        }
    }

    #[test]
    fn test_axis_rounding_allows_exact_nodes() {
        let table = builder().build(&raw_curve()).unwrap();
        assert!(table.windspeeds().contains(&3.5));
        assert!(table.densities().contains(&1.175));

        let p = table.power_at(4.0, 1.225).unwrap();
        assert!((p - 400.0).abs() < 1e-6, "got {p}");
    }

    #[test]
    fn test_get_power_length_mismatch() {
        let table = builder().build(&raw_curve()).unwrap();
        let result = table.get_power(&[4.0, 5.0], &[1.225], InterpolationMethod::Linear);
        assert!(matches!(
            result,
            Err(PowerCurveError::LengthMismatch {
                windspeeds: 2,
                densities: 1
            })
        ));
    }

    #[test]
    fn test_nearest_lookup_always_defined() {
        let table = builder().build(&raw_curve()).unwrap();
        // Far outside the table, nearest snaps to the rim.
        let p = table
            .get_power(&[99.0], &[9.9], InterpolationMethod::Nearest)
            .unwrap();
        assert!((p[0] - table.power_at(6.0, 1.325).unwrap()).abs() < 1e-6);
    }

    #[test]
    fn test_linear_miss_is_fatal() {
        let table = builder().build(&raw_curve()).unwrap();
        assert!(matches!(
            table.power_at(99.0, 1.225),
            Err(PowerCurveError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_cubic_lookup_unsupported() {
        let table = builder().build(&raw_curve()).unwrap();
        assert!(matches!(
            table.get_power(&[4.0], &[1.225], InterpolationMethod::Cubic),
            Err(PowerCurveError::UnsupportedLookup(_))
        ));
    }

    #[test]
    fn test_expand_single_density() {
        let reference = builder().build(&raw_curve()).unwrap();

        let mut csv = String::from("wspd;1.225\n");
        for v in 2..=6 {
            csv.push_str(&format!("{v}.0;{}\n", 50.0 * v as f64));
        }
        let single = RawPowerCurve::from_reader(csv.as_bytes()).unwrap();
        let target = PowerCurveBuilder {
            extend_to_zero: false,
            ..builder()
        }
        .build(&single)
        .unwrap();

        let expanded = target.expand_single_density(&reference).unwrap();
        assert_eq!(expanded.densities(), reference.densities());

        // reference scales linearly with rho, so the expansion does too.
        let p = expanded.power_at(4.0, 1.325).unwrap();
        let expected = 50.0 * 4.0 * 1.325 / 1.225;
        assert!((p - expected).abs() < 1e-6, "got {p}, want {expected}");
    }

    #[test]
    fn test_expand_rejects_multi_density_curve() {
        let table = builder().build(&raw_curve()).unwrap();
        assert!(matches!(
            table.expand_single_density(&table),
            Err(PowerCurveError::NotSingleDensity(_))
        ));
    }

    #[test]
    fn test_csv_roundtrip_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let table = builder().build(&raw_curve()).unwrap();
        table.write_csv_path(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next().unwrap(),
            format!(
                "wspd;{}",
                table
                    .densities()
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(";")
            )
        );
        assert_eq!(lines.count(), table.windspeeds().len());
    }
}
