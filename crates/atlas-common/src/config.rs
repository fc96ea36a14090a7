//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::TimeFrame;

/// Configuration shared by the extraction and yield engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Base path of the wind atlas grid tree.
    pub base_path: PathBuf,

    /// Optional CSV with corrected x/y axis values reassigned onto
    /// loaded grids (fixes upstream projection drift).
    pub remap_csv: Option<PathBuf>,

    /// Worker count for per-year parallel extraction.
    pub workers: usize,

    /// Wall-clock deadline for one parallel extraction; `None`
    /// disables the deadline.
    pub extraction_deadline: Option<Duration>,

    /// Date window the grids cover; requested time frames must lie
    /// fully inside it.
    pub validity_window: TimeFrame,

    /// Availability factor applied to AEP results.
    pub availability: f64,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("/data/windatlas"),
            remap_csv: None,
            workers: default_workers(),
            extraction_deadline: None,
            validity_window: default_validity_window(),
            availability: 0.85,
        }
    }
}

impl AtlasConfig {
    /// Load configuration from environment variables, starting from
    /// the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("WINDATLAS_BASE_PATH") {
            config.base_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("WINDATLAS_REMAP_CSV") {
            config.remap_csv = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("WINDATLAS_WORKERS") {
            if let Ok(n) = val.parse() {
                config.workers = n;
            }
        }

        if let Ok(val) = std::env::var("WINDATLAS_DEADLINE_SECS") {
            if let Ok(secs) = val.parse() {
                config.extraction_deadline = Some(Duration::from_secs(secs));
            }
        }

        if let (Ok(start), Ok(end)) = (
            std::env::var("WINDATLAS_WINDOW_START"),
            std::env::var("WINDATLAS_WINDOW_END"),
        ) {
            if let Ok(window) = TimeFrame::parse(&start, &end) {
                config.validity_window = window;
            }
        }

        if let Ok(val) = std::env::var("WINDATLAS_AVAILABILITY") {
            if let Ok(s) = val.parse() {
                config.availability = s;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("workers must be >= 1".to_string());
        }

        if !(self.availability > 0.0 && self.availability <= 1.0) {
            return Err(format!(
                "availability must be in (0, 1], got {}",
                self.availability
            ));
        }

        Ok(())
    }
}

/// Available cores minus one, but never less than one.
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1).max(1))
        .unwrap_or(1)
}

fn default_validity_window() -> TimeFrame {
    // Coverage of the atlas delivery this engine was built against.
    TimeFrame {
        start: NaiveDate::from_ymd_opt(2009, 1, 1).expect("valid date"),
        end: NaiveDate::from_ymd_opt(2018, 12, 31).expect("valid date"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = AtlasConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.workers >= 1);
        assert_eq!(config.availability, 0.85);
        assert_eq!(config.validity_window.years(), 2009..=2018);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AtlasConfig::default();
        config.workers = 0;
        assert!(config.validate().is_err());

        config = AtlasConfig::default();
        config.availability = 0.0;
        assert!(config.validate().is_err());

        config.availability = 1.5;
        assert!(config.validate().is_err());
    }
}
