//! Annual energy production from wind statistics.
//!
//! When only summary statistics are available for a site (Weibull A
//! and k, or a Rayleigh mean windspeed) the expected yield is
//! integrated over the power curve: the distribution's CDF gives the
//! probability mass per windspeed bin, the power curve the output at
//! that bin, and the trapezoidal sum over the year's hours the AEP.

pub mod aep;
pub mod distribution;
pub mod error;

pub use aep::{annual_energy_production, rayleigh_aep, weibull_aep, HOURS_PER_YEAR};
pub use distribution::{rayleigh_cdf, weibull_cdf};
pub use error::{Result, YieldError};
