//! Windspeed distribution CDFs.

use std::f64::consts::PI;

use crate::error::{Result, YieldError};

/// Weibull CDF `1 - exp(-(v/A)^k)` over a windspeed-bin array.
pub fn weibull_cdf(bins: &[f64], a: f64, k: f64) -> Result<Vec<f64>> {
    if !(a > 0.0) {
        return Err(YieldError::InvalidParameter {
            name: "Weibull scale A",
            value: a,
        });
    }
    if !(k > 0.0) {
        return Err(YieldError::InvalidParameter {
            name: "Weibull shape k",
            value: k,
        });
    }
    Ok(bins
        .iter()
        .map(|&v| 1.0 - (-(v / a).powf(k)).exp())
        .collect())
}

/// Rayleigh CDF `1 - exp(-(pi/4)(v/vMean)^2)` over a windspeed-bin
/// array.
pub fn rayleigh_cdf(bins: &[f64], v_mean: f64) -> Result<Vec<f64>> {
    if !(v_mean > 0.0) {
        return Err(YieldError::InvalidParameter {
            name: "mean windspeed",
            value: v_mean,
        });
    }
    Ok(bins
        .iter()
        .map(|&v| 1.0 - (-(PI / 4.0) * (v / v_mean).powi(2)).exp())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weibull_bounds_and_monotonicity() {
        let bins: Vec<f64> = (0..=300).map(|i| i as f64 * 0.1).collect();
        let cdf = weibull_cdf(&bins, 8.0, 2.0).unwrap();

        assert_eq!(cdf[0], 0.0);
        assert!(cdf[cdf.len() - 1] > 0.999);
        assert!(cdf.windows(2).all(|w| w[1] >= w[0]));
        assert!(cdf.iter().all(|&f| (0.0..=1.0).contains(&f)));
    }

    #[test]
    fn test_rayleigh_bounds_and_monotonicity() {
        let bins: Vec<f64> = (0..=300).map(|i| i as f64 * 0.1).collect();
        let cdf = rayleigh_cdf(&bins, 7.0).unwrap();

        assert_eq!(cdf[0], 0.0);
        assert!(cdf[cdf.len() - 1] > 0.999);
        assert!(cdf.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_rayleigh_median_relation() {
        // For Rayleigh, CDF(vMean) = 1 - exp(-pi/4).
        let cdf = rayleigh_cdf(&[7.0], 7.0).unwrap();
        let expected = 1.0 - (-PI / 4.0).exp();
        assert!((cdf[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(matches!(
            weibull_cdf(&[1.0], 0.0, 2.0),
            Err(YieldError::InvalidParameter { .. })
        ));
        assert!(matches!(
            weibull_cdf(&[1.0], 8.0, -1.0),
            Err(YieldError::InvalidParameter { .. })
        ));
        assert!(matches!(
            rayleigh_cdf(&[1.0], 0.0),
            Err(YieldError::InvalidParameter { .. })
        ));
        assert!(matches!(
            weibull_cdf(&[1.0], f64::NAN, 2.0),
            Err(YieldError::InvalidParameter { .. })
        ));
    }
}
