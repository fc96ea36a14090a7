//! Wind-atlas command-line frontend.
//!
//! Thin shell over the engine crates: point extraction from the
//! gridded atlas, power-curve table building, and AEP computation.
//! Exits non-zero on any fatal engine error.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use atlas_common::{
    AtlasConfig, GeoPoint, GridStorage, InterpolationMethod, TimeFrame, WindVariable,
};
use power_curve::{PowerCurveBuilder, PowerCurveTable, RawPowerCurve, REFERENCE_DENSITY};
use projection::{Engine, Transformer};
use turbine_point::{CalculationMethod, PointCollection, PointOutcome, PointResult, TurbinePoint};
use wind_grid::{CancelToken, Extraction};

#[derive(Parser, Debug)]
#[command(name = "windatlas")]
#[command(about = "Wind-atlas point extraction and energy-yield engine")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interpolate one wind variable at a geographic point
    ExtractPoint(ExtractPointArgs),
    /// Build a fine 2-D power table from a raw manufacturer curve
    BuildPowerCurve(BuildPowerCurveArgs),
    /// Compute annual energy production for one turbine site
    ComputeAep(ComputeAepArgs),
}

#[derive(Parser, Debug)]
struct ExtractPointArgs {
    #[arg(long)]
    lat: f64,
    #[arg(long)]
    lon: f64,
    /// Hub height in meters (snapped to the nearest grid level)
    #[arg(long)]
    level: f64,
    /// Variable code: wspd, rho, rhum, wdir, pres, wbA, wbk
    #[arg(long)]
    variable: String,
    /// Storage layout: ts, nc, 90m, 3km
    #[arg(long)]
    storage: String,
    /// Start of the time frame (YYYY, YYYY-MM or YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,
    /// End of the time frame
    #[arg(long)]
    to: Option<String>,
    /// Spatial interpolation: nearest, linear, quadratic, cubic
    #[arg(long, default_value = "linear")]
    method: String,
}

#[derive(Parser, Debug)]
struct BuildPowerCurveArgs {
    /// Raw semicolon-separated manufacturer curve
    #[arg(long)]
    input: PathBuf,
    /// Output path for the built table CSV
    #[arg(long)]
    output: PathBuf,
    #[arg(long, default_value = "0.01")]
    increment_wspd: f64,
    #[arg(long, default_value = "0.001")]
    increment_rho: f64,
    /// Keep cubic overshoot instead of clamping to [0, max(raw)]
    #[arg(long)]
    no_power_limiter: bool,
    /// Do not prepend zero-power rows below cut-in
    #[arg(long)]
    no_extend_to_zero: bool,
}

#[derive(Parser, Debug)]
struct ComputeAepArgs {
    #[arg(long)]
    lat: f64,
    #[arg(long)]
    lon: f64,
    #[arg(long)]
    level: f64,
    /// Raw power-curve CSV for the turbine type
    #[arg(long)]
    curve: PathBuf,
    /// Calculation method: ts-3km, weibull-90m, rayleigh-90m,
    /// weibull-3km, rayleigh-3km (ignored when --a/--k or --v-mean
    /// are given)
    #[arg(long)]
    method: Option<String>,
    /// Explicit Weibull scale, bypassing grid extraction
    #[arg(long, requires = "k")]
    a: Option<f64>,
    /// Explicit Weibull shape
    #[arg(long, requires = "a")]
    k: Option<f64>,
    /// Explicit Rayleigh mean windspeed, bypassing grid extraction
    #[arg(long, conflicts_with_all = ["a", "k"])]
    v_mean: Option<f64>,
    /// Air density for explicit-parameter modes
    #[arg(long)]
    rho: Option<f64>,
    #[arg(long)]
    availability: Option<f64>,
    #[arg(long)]
    from: Option<String>,
    #[arg(long)]
    to: Option<String>,
    /// Spatial interpolation for the grid axes
    #[arg(long, default_value = "linear")]
    interpolation: String,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::ExtractPoint(args) => extract_point(args),
        Command::BuildPowerCurve(args) => build_power_curve(args),
        Command::ComputeAep(args) => compute_aep(args),
    }
}

fn parse_frame(from: &Option<String>, to: &Option<String>) -> Result<Option<TimeFrame>> {
    match (from, to) {
        (Some(from), Some(to)) => Ok(Some(TimeFrame::parse(from, to)?)),
        (None, None) => Ok(None),
        _ => bail!("--from and --to must be given together"),
    }
}

fn extract_point(args: ExtractPointArgs) -> Result<()> {
    let config = AtlasConfig::from_env();
    config.validate().map_err(|e| anyhow!(e))?;

    let variable = WindVariable::from_code(&args.variable)
        .ok_or_else(|| anyhow!("unknown variable code: {}", args.variable))?;
    let storage: GridStorage = args.storage.parse().map_err(|e: String| anyhow!(e))?;
    let method: InterpolationMethod = args.method.parse().map_err(|e: String| anyhow!(e))?;
    let frame = parse_frame(&args.from, &args.to)?;

    let transformer = Transformer::new(Engine::Native)?;
    let projected = transformer.transform(GeoPoint::new(args.lat, args.lon))?;
    info!(x = projected.x, y = projected.y, "resolved grid coordinate");

    let source = wind_grid::open_source(&config, variable, storage, frame.as_ref(), CancelToken::new())?;
    let extraction = source.interpolate_point(projected.x, projected.y, args.level, method)?;

    let output = match extraction {
        Extraction::Scalar(value) => json!({
            "variable": variable.code(),
            "units": variable.units(),
            "value": value,
        }),
        Extraction::Series(series) => json!({
            "variable": variable.code(),
            "units": variable.units(),
            "times": series.times.iter().map(|t| t.to_rfc3339()).collect::<Vec<_>>(),
            "values": series.values,
        }),
    };
    println!("{output}");
    Ok(())
}

fn build_power_curve(args: BuildPowerCurveArgs) -> Result<()> {
    let raw = RawPowerCurve::from_csv_path(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let table = PowerCurveBuilder {
        increment_windspeed: args.increment_wspd,
        increment_air_density: args.increment_rho,
        power_limiter: !args.no_power_limiter,
        extend_to_zero: !args.no_extend_to_zero,
    }
    .build(&raw)?;

    table.write_csv_path(&args.output)?;
    info!(
        windspeeds = table.windspeeds().len(),
        densities = table.densities().len(),
        output = %args.output.display(),
        "power curve table written"
    );
    Ok(())
}

fn compute_aep(args: ComputeAepArgs) -> Result<()> {
    let mut config = AtlasConfig::from_env();
    if let Some(availability) = args.availability {
        config.availability = availability;
    }
    config.validate().map_err(|e| anyhow!(e))?;

    let raw = RawPowerCurve::from_csv_path(&args.curve)
        .with_context(|| format!("reading {}", args.curve.display()))?;
    let table = PowerCurveBuilder::default().build(&raw)?;

    // Explicit distribution parameters bypass the grids entirely.
    let rho = args.rho.unwrap_or(REFERENCE_DENSITY);
    if let (Some(a), Some(k)) = (args.a, args.k) {
        let aep = energy_yield::weibull_aep(&table, a, k, rho, config.availability, None)?;
        print_aep(aep, config.availability);
        return Ok(());
    }
    if let Some(v_mean) = args.v_mean {
        let aep = energy_yield::rayleigh_aep(&table, v_mean, rho, config.availability, None)?;
        print_aep(aep, config.availability);
        return Ok(());
    }

    let method: CalculationMethod = args
        .method
        .as_deref()
        .ok_or_else(|| anyhow!("--method is required unless --a/--k or --v-mean are given"))?
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let frame = parse_frame(&args.from, &args.to)?;
    let interpolation: InterpolationMethod =
        args.interpolation.parse().map_err(|e: String| anyhow!(e))?;

    let turbine_type = "cli".to_string();
    let availability = config.availability;
    let collection = PointCollection::new(
        config,
        method,
        frame,
        HashMap::from([(turbine_type.clone(), table)]),
    )?;

    let point = TurbinePoint {
        id: "point".to_string(),
        geo: GeoPoint::new(args.lat, args.lon),
        hub_height: args.level,
        turbine_type,
        interpolation,
    };

    let results = collection.compute(std::slice::from_ref(&point))?;
    match results.get("point") {
        Some(PointOutcome::Completed(PointResult::Aep(aep))) => {
            print_aep(*aep, availability);
        }
        Some(PointOutcome::Completed(PointResult::PowerTimeSeries(series))) => {
            let output = json!({
                "times": series.times.iter().map(|t| t.to_rfc3339()).collect::<Vec<_>>(),
                "power_kw": series.values,
            });
            println!("{output}");
        }
        Some(PointOutcome::Failed { stage, error }) => {
            bail!("point computation failed at stage '{stage}': {error}");
        }
        None => bail!("no result produced"),
    }
    Ok(())
}

fn print_aep(aep: f64, availability: f64) {
    let output = json!({
        "aep_kwh": aep,
        "availability": availability,
    });
    println!("{output}");
}
