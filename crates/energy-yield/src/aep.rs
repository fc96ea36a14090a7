//! Trapezoidal AEP integration over a probability-weighted power
//! curve.

use power_curve::PowerCurveTable;

use crate::distribution::{rayleigh_cdf, weibull_cdf};
use crate::error::{Result, YieldError};

pub const HOURS_PER_YEAR: f64 = 8760.0;

fn check_availability(availability: f64) -> Result<()> {
    if !(availability > 0.0 && availability <= 1.0) {
        return Err(YieldError::InvalidParameter {
            name: "availability",
            value: availability,
        });
    }
    Ok(())
}

/// Annual energy production in kWh from per-bin cumulative
/// probabilities and powers.
///
/// Bin 0 contributes `8760 * F[0] * P[0]`; every later bin the
/// trapezoid `8760 * (F[i]-F[i-1]) * (P[i]+P[i-1])/2`. The sum is
/// scaled by the availability factor.
pub fn annual_energy_production(
    probabilities: &[f64],
    powers: &[f64],
    availability: f64,
) -> Result<f64> {
    check_availability(availability)?;
    if probabilities.len() != powers.len() {
        return Err(YieldError::LengthMismatch {
            probabilities: probabilities.len(),
            powers: powers.len(),
        });
    }
    if probabilities.is_empty() {
        return Err(YieldError::EmptyBins);
    }

    let mut total = HOURS_PER_YEAR * probabilities[0] * powers[0];
    for i in 1..probabilities.len() {
        let mass = probabilities[i] - probabilities[i - 1];
        let mean_power = (powers[i] + powers[i - 1]) / 2.0;
        total += HOURS_PER_YEAR * mass * mean_power;
    }
    Ok(total * availability)
}

/// AEP for a Weibull-distributed site: bins are the table's
/// windspeed axis, powers the table column at the site's air
/// density. `years` scales a single representative year to a
/// multi-year estimate.
pub fn weibull_aep(
    table: &PowerCurveTable,
    a: f64,
    k: f64,
    air_density: f64,
    availability: f64,
    years: Option<u32>,
) -> Result<f64> {
    let bins = table.windspeeds();
    let probabilities = weibull_cdf(bins, a, k)?;
    let powers = bin_powers(table, air_density)?;
    let aep = annual_energy_production(&probabilities, &powers, availability)?;
    Ok(aep * years.unwrap_or(1) as f64)
}

/// AEP for a Rayleigh-distributed site, parameterized by the mean
/// windspeed.
pub fn rayleigh_aep(
    table: &PowerCurveTable,
    v_mean: f64,
    air_density: f64,
    availability: f64,
    years: Option<u32>,
) -> Result<f64> {
    let bins = table.windspeeds();
    let probabilities = rayleigh_cdf(bins, v_mean)?;
    let powers = bin_powers(table, air_density)?;
    let aep = annual_energy_production(&probabilities, &powers, availability)?;
    Ok(aep * years.unwrap_or(1) as f64)
}

fn bin_powers(table: &PowerCurveTable, air_density: f64) -> Result<Vec<f64>> {
    table
        .windspeeds()
        .iter()
        .map(|&v| table.power_at(v, air_density).map_err(YieldError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use power_curve::{PowerCurveBuilder, RawPowerCurve};

    #[test]
    fn test_single_bin_identity() {
        let aep = annual_energy_production(&[1.0], &[2000.0], 0.85).unwrap();
        assert!((aep - HOURS_PER_YEAR * 2000.0 * 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_trapezoid_two_bins() {
        // bin 0: 8760 * 0.25 * 100; bin 1: 8760 * 0.5 * 150
        let aep = annual_energy_production(&[0.25, 0.75], &[100.0, 200.0], 1.0).unwrap();
        let expected = HOURS_PER_YEAR * (0.25 * 100.0 + 0.5 * 150.0);
        assert!((aep - expected).abs() < 1e-9);
    }

    #[test]
    fn test_input_validation() {
        assert!(matches!(
            annual_energy_production(&[1.0], &[1.0, 2.0], 0.85),
            Err(YieldError::LengthMismatch { .. })
        ));
        assert!(matches!(
            annual_energy_production(&[], &[], 0.85),
            Err(YieldError::EmptyBins)
        ));
        assert!(matches!(
            annual_energy_production(&[1.0], &[1.0], 0.0),
            Err(YieldError::InvalidParameter { .. })
        ));
        assert!(matches!(
            annual_energy_production(&[1.0], &[1.0], 1.5),
            Err(YieldError::InvalidParameter { .. })
        ));
    }

    fn constant_table(power: f64) -> PowerCurveTable {
        let mut csv = String::from("wspd;1.125;1.225;1.325\n");
        for v in 0..=25 {
            csv.push_str(&format!("{v}.0;{power};{power};{power}\n"));
        }
        let raw = RawPowerCurve::from_reader(csv.as_bytes()).unwrap();
        PowerCurveBuilder {
            increment_windspeed: 0.5,
            increment_air_density: 0.05,
            power_limiter: true,
            extend_to_zero: false,
        }
        .build(&raw)
        .unwrap()
    }

    #[test]
    fn test_weibull_aep_constant_power_telescopes() {
        // With constant power P the trapezoid sum telescopes to
        // 8760 * F(vMax) * P * availability.
        let table = constant_table(2000.0);
        let aep = weibull_aep(&table, 8.0, 2.0, 1.225, 0.85, None).unwrap();

        let bins = table.windspeeds();
        let f_max = weibull_cdf(&[bins[bins.len() - 1]], 8.0, 2.0).unwrap()[0];
        let expected = HOURS_PER_YEAR * f_max * 2000.0 * 0.85;
        assert!((aep - expected).abs() < 1e-6, "got {aep}, want {expected}");
    }

    #[test]
    fn test_years_multiplier() {
        let table = constant_table(1500.0);
        let one = rayleigh_aep(&table, 7.0, 1.225, 0.85, None).unwrap();
        let ten = rayleigh_aep(&table, 7.0, 1.225, 0.85, Some(10)).unwrap();
        assert!((ten - 10.0 * one).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_distribution_parameters_propagate() {
        let table = constant_table(1000.0);
        assert!(matches!(
            weibull_aep(&table, -1.0, 2.0, 1.225, 0.85, None),
            Err(YieldError::InvalidParameter { .. })
        ));
        assert!(matches!(
            rayleigh_aep(&table, 0.0, 1.225, 0.85, None),
            Err(YieldError::InvalidParameter { .. })
        ));
    }
}
