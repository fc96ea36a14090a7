//! Raw manufacturer power-curve parsing.
//!
//! The input is a semicolon-separated table: header holds one air
//! density per column (after a label cell), each row a windspeed
//! followed by the power output at that speed. Rows with missing
//! cells are dropped; columns arrive in arbitrary order and are
//! sorted ascending by density.

use std::io::Read;
use std::path::Path;

use crate::error::{PowerCurveError, Result};

#[derive(Debug, Clone)]
pub struct RawPowerCurve {
    windspeeds: Vec<f64>,
    densities: Vec<f64>,
    /// Row-major `[windspeed][density]`.
    powers: Vec<f64>,
}

impl RawPowerCurve {
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_path(path)?;
        Self::parse(reader)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_reader(reader);
        Self::parse(reader)
    }

    fn parse<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        let mut densities = Vec::new();
        for cell in headers.iter().skip(1) {
            let rho: f64 = cell
                .trim()
                .parse()
                .map_err(|_| PowerCurveError::InvalidHeader(cell.to_string()))?;
            densities.push(rho);
        }
        if densities.is_empty() {
            return Err(PowerCurveError::InvalidHeader(String::new()));
        }

        let mut rows: Vec<(f64, Vec<f64>)> = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            // Header is line 1.
            let row = idx + 2;

            match parse_row(&record, densities.len(), row)? {
                Some(parsed) => rows.push(parsed),
                None => continue,
            }
        }

        if rows.len() < 2 {
            return Err(PowerCurveError::TooFewRows(rows.len()));
        }

        // Sort columns by density and rows by windspeed so the axes
        // ascend regardless of input order.
        let mut order: Vec<usize> = (0..densities.len()).collect();
        order.sort_by(|&a, &b| densities[a].total_cmp(&densities[b]));
        densities = order.iter().map(|&c| densities[c]).collect();
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));

        let windspeeds: Vec<f64> = rows.iter().map(|(v, _)| *v).collect();
        let mut powers = Vec::with_capacity(rows.len() * densities.len());
        for (_, row) in &rows {
            for &c in &order {
                powers.push(row[c]);
            }
        }

        Ok(Self {
            windspeeds,
            densities,
            powers,
        })
    }

    pub fn windspeeds(&self) -> &[f64] {
        &self.windspeeds
    }

    pub fn densities(&self) -> &[f64] {
        &self.densities
    }

    pub fn value(&self, w: usize, c: usize) -> f64 {
        self.powers[w * self.densities.len() + c]
    }

    /// One density column over the whole windspeed axis.
    pub fn column(&self, c: usize) -> Vec<f64> {
        (0..self.windspeeds.len()).map(|w| self.value(w, c)).collect()
    }

    pub fn max_power(&self) -> f64 {
        self.powers.iter().copied().fold(f64::MIN, f64::max)
    }
}

/// Parse one data row; `None` means the row had missing cells and is
/// dropped.
fn parse_row(
    record: &csv::StringRecord,
    columns: usize,
    row: usize,
) -> Result<Option<(f64, Vec<f64>)>> {
    if record.len() < columns + 1 {
        return Ok(None);
    }

    let mut cells = Vec::with_capacity(columns + 1);
    for cell in record.iter().take(columns + 1) {
        let cell = cell.trim();
        if cell.is_empty() {
            return Ok(None);
        }
        let value: f64 = cell.parse().map_err(|_| PowerCurveError::InvalidNumber {
            row,
            value: cell.to_string(),
        })?;
        cells.push(value);
    }

    let windspeed = cells.remove(0);
    Ok(Some((windspeed, cells)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sorts_and_drops_incomplete_rows() {
        let csv = "\
wspd;1.25;1.125
3.0;100;90
4.0;;180
5.0;400;360
";
        let curve = RawPowerCurve::from_reader(csv.as_bytes()).unwrap();

        // Columns resorted ascending, row with the blank cell gone.
        assert_eq!(curve.densities(), &[1.125, 1.25]);
        assert_eq!(curve.windspeeds(), &[3.0, 5.0]);
        assert_eq!(curve.value(0, 0), 90.0);
        assert_eq!(curve.value(0, 1), 100.0);
        assert_eq!(curve.column(1), vec![100.0, 400.0]);
        assert_eq!(curve.max_power(), 400.0);
    }

    #[test]
    fn test_parse_from_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.csv");
        test_utils::write_power_curve_csv(
            &path,
            &[1.225, 1.125],
            &[
                (3.0, vec![Some(100.0), Some(90.0)]),
                (4.0, vec![Some(200.0), None]),
                (5.0, vec![Some(400.0), Some(360.0)]),
            ],
        )
        .unwrap();

        let curve = RawPowerCurve::from_csv_path(&path).unwrap();
        assert_eq!(curve.densities(), &[1.125, 1.225]);
        assert_eq!(curve.windspeeds(), &[3.0, 5.0]);
        assert_eq!(curve.value(1, 1), 400.0);
    }

    #[test]
    fn test_bad_header_rejected() {
        let csv = "wspd;not-a-density\n3.0;100\n4.0;200\n";
        assert!(matches!(
            RawPowerCurve::from_reader(csv.as_bytes()),
            Err(PowerCurveError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_bad_cell_rejected() {
        let csv = "wspd;1.225\n3.0;abc\n4.0;200\n5.0;300\n";
        assert!(matches!(
            RawPowerCurve::from_reader(csv.as_bytes()),
            Err(PowerCurveError::InvalidNumber { row: 2, .. })
        ));
    }

    #[test]
    fn test_too_few_rows_rejected() {
        let csv = "wspd;1.225\n3.0;100\n";
        assert!(matches!(
            RawPowerCurve::from_reader(csv.as_bytes()),
            Err(PowerCurveError::TooFewRows(1))
        ));
    }
}
