//! Batch result table and CSV export.
//!
//! One column per turbine point, keyed by point identity. Series
//! batches export a time-indexed table, AEP batches a two-column
//! scalar table. Failed points are kept in the table for reporting
//! but left out of the CSV.

use std::path::Path;

use crate::error::Result;
use crate::method::CalculationMethod;
use crate::point::{PointOutcome, PointResult};

#[derive(Debug)]
pub struct ResultTable {
    method: CalculationMethod,
    entries: Vec<(String, PointOutcome)>,
}

impl ResultTable {
    pub fn new(method: CalculationMethod) -> Self {
        Self {
            method,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, id: String, outcome: PointOutcome) {
        self.entries.push((id, outcome));
    }

    pub fn method(&self) -> CalculationMethod {
        self.method
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PointOutcome> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, outcome)| outcome)
    }

    pub fn outcomes(&self) -> impl Iterator<Item = (&str, &PointOutcome)> {
        self.entries
            .iter()
            .map(|(id, outcome)| (id.as_str(), outcome))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &PointOutcome)> {
        self.outcomes().filter(|(_, outcome)| outcome.is_failed())
    }

    /// Export completed points as a semicolon-separated CSV.
    pub fn write_csv_path(&self, path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;

        if self.method.needs_time_frame() {
            let columns: Vec<(&str, &crate::point::PointResult)> = self
                .outcomes()
                .filter_map(|(id, outcome)| outcome.result().map(|r| (id, r)))
                .collect();

            let mut header = vec!["time".to_string()];
            let mut series = Vec::new();
            for (id, result) in &columns {
                if let PointResult::PowerTimeSeries(s) = result {
                    header.push(id.to_string());
                    series.push(s);
                }
            }
            writer.write_record(&header)?;

            // All points of one batch share the extraction timeline.
            if let Some(first) = series.first() {
                for (row, time) in first.times.iter().enumerate() {
                    let mut record = vec![time.to_rfc3339()];
                    for s in &series {
                        record.push(s.values[row].to_string());
                    }
                    writer.write_record(&record)?;
                }
            }
        } else {
            writer.write_record(["point", "aep_kwh"])?;
            for (id, outcome) in self.outcomes() {
                if let Some(PointResult::Aep(aep)) = outcome.result() {
                    writer.write_record([id, &aep.to_string()])?;
                }
            }
        }

        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PointError;
    use crate::point::Stage;
    use chrono::{TimeZone, Utc};
    use wind_grid::ValueSeries;

    #[test]
    fn test_scalar_export_skips_failures() {
        let mut table = ResultTable::new(CalculationMethod::Mean3kmWeibull);
        table.push(
            "wea-1".to_string(),
            PointOutcome::Completed(PointResult::Aep(14_892_000.0)),
        );
        table.push(
            "wea-2".to_string(),
            PointOutcome::Failed {
                stage: Stage::WindExtracted,
                error: PointError::MissingPowerCurve("unknown".to_string()),
            },
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aep.csv");
        table.write_csv_path(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "point;aep_kwh");
        assert_eq!(lines[1], "wea-1;14892000");
        assert_eq!(lines.len(), 2);

        assert_eq!(table.failures().count(), 1);
        assert!(table.get("wea-2").unwrap().is_failed());
    }

    #[test]
    fn test_series_export_layout() {
        let times = vec![
            Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2010, 1, 1, 1, 0, 0).unwrap(),
        ];
        let mut table = ResultTable::new(CalculationMethod::TimeSeries3km);
        table.push(
            "wea-1".to_string(),
            PointOutcome::Completed(PointResult::PowerTimeSeries(ValueSeries::new(
                times.clone(),
                vec![2000.0, 1800.0],
            ))),
        );
        table.push(
            "wea-2".to_string(),
            PointOutcome::Completed(PointResult::PowerTimeSeries(ValueSeries::new(
                times,
                vec![1500.0, 1600.0],
            ))),
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("power.csv");
        table.write_csv_path(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "time;wea-1;wea-2");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(";2000;1500"));
        assert!(lines[2].ends_with(";1800;1600"));
    }
}
