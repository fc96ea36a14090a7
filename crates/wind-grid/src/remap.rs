//! Coordinate remap table.
//!
//! The atlas ships a CSV with corrected x/y axis values that are
//! reassigned onto every loaded grid, fixing projection drift in the
//! upstream delivery. The x column is shorter than y and padded with
//! blanks, which are dropped.

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Deserialize)]
struct RemapRow {
    x: Option<f64>,
    y: Option<f64>,
}

/// Corrected grid axes read from the remap CSV.
#[derive(Debug, Clone)]
pub struct RemapTable {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl RemapTable {
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut xs = Vec::new();
        let mut ys = Vec::new();

        for row in reader.deserialize() {
            let row: RemapRow = row?;
            if let Some(x) = row.x {
                xs.push(x);
            }
            if let Some(y) = row.y {
                ys.push(y);
            }
        }

        Ok(Self { xs, ys })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_blank_x_cells_dropped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "x,y").unwrap();
        writeln!(file, "100,10.5").unwrap();
        writeln!(file, "200,20.5").unwrap();
        writeln!(file, ",30.5").unwrap();
        writeln!(file, ",40.5").unwrap();
        file.flush().unwrap();

        let table = RemapTable::from_csv_path(file.path()).unwrap();
        assert_eq!(table.xs, vec![100.0, 200.0]);
        assert_eq!(table.ys, vec![10.5, 20.5, 30.5, 40.5]);
    }
}
