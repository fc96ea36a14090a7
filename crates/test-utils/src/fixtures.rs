//! File fixtures: synthetic NetCDF grids and power-curve CSVs.

use std::io::Write;
use std::path::Path;

use atlas_common::WindVariable;

/// Write a synthetic atlas grid file.
///
/// Dimension order is `[time][level][y][x]`; `levels` may be empty
/// and `times` absent, in which case the matching dimension is left
/// out of the file. `times` carries the CF units string plus the
/// offsets in that unit. `data` must match the implied shape.
pub fn write_grid_nc(
    path: &Path,
    variable: WindVariable,
    xs: &[f64],
    ys: &[f64],
    levels: &[f64],
    times: Option<(&str, &[f64])>,
    data: &[f32],
) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;

    let mut dims: Vec<&str> = Vec::new();

    if let Some((units, offsets)) = times {
        file.add_dimension("time", offsets.len())?;
        let mut var = file.add_variable::<f64>("time", &["time"])?;
        var.put_attribute("units", units)?;
        var.put_values(offsets, ..)?;
        dims.push("time");
    }

    if !levels.is_empty() {
        file.add_dimension("level", levels.len())?;
        let mut var = file.add_variable::<f64>("level", &["level"])?;
        var.put_attribute("units", "m")?;
        var.put_values(levels, ..)?;
        dims.push("level");
    }

    file.add_dimension("y", ys.len())?;
    let mut y_var = file.add_variable::<f64>("y", &["y"])?;
    y_var.put_attribute("units", "m")?;
    y_var.put_values(ys, ..)?;

    file.add_dimension("x", xs.len())?;
    let mut x_var = file.add_variable::<f64>("x", &["x"])?;
    x_var.put_attribute("units", "m")?;
    x_var.put_values(xs, ..)?;

    dims.push("y");
    dims.push("x");

    let mut var = file.add_variable::<f32>(variable.code(), &dims)?;
    var.put_attribute("units", variable.units())?;
    var.put_values(data, ..)?;

    Ok(())
}

/// Write a raw manufacturer power-curve CSV.
///
/// The format is semicolon-separated: the header holds a label cell
/// followed by one air-density value per column, each row a wind
/// speed followed by the power values at that speed. `None` cells
/// are written empty.
pub fn write_power_curve_csv(
    path: &Path,
    densities: &[f64],
    rows: &[(f64, Vec<Option<f64>>)],
) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;

    write!(file, "wspd")?;
    for rho in densities {
        write!(file, ";{rho}")?;
    }
    writeln!(file)?;

    for (wspd, powers) in rows {
        write!(file, "{wspd}")?;
        for power in powers {
            match power {
                Some(p) => write!(file, ";{p}")?,
                None => write!(file, ";")?,
            }
        }
        writeln!(file)?;
    }

    file.flush()
}
