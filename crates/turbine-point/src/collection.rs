//! The batch orchestrator.

use std::collections::HashMap;

use atlas_common::{AtlasConfig, GridStorage, InterpolationMethod, TimeFrame, WindVariable};
use energy_yield::{rayleigh_aep, weibull_aep};
use power_curve::PowerCurveTable;
use projection::{Engine, Transformer};
use wind_grid::{open_source, CancelToken, Extraction, ValueSeries, WindDataSource};

use crate::error::{PointError, Result};
use crate::method::CalculationMethod;
use crate::point::{PointOutcome, PointResult, Stage, TurbinePoint};
use crate::result::ResultTable;

type SourceMap = HashMap<(WindVariable, GridStorage), Box<dyn WindDataSource>>;

/// Drives a batch of turbine points through coordinate resolution,
/// wind extraction and power/AEP computation, sharing grid sources
/// and power curves across all points.
pub struct PointCollection {
    config: AtlasConfig,
    method: CalculationMethod,
    frame: Option<TimeFrame>,
    curves: HashMap<String, PowerCurveTable>,
    transformer: Transformer,
    cancel: CancelToken,
}

impl PointCollection {
    pub fn new(
        config: AtlasConfig,
        method: CalculationMethod,
        frame: Option<TimeFrame>,
        curves: HashMap<String, PowerCurveTable>,
    ) -> Result<Self> {
        config.validate().map_err(PointError::Config)?;
        let transformer = Transformer::new(Engine::Native)?;
        Ok(Self {
            config,
            method,
            frame,
            curves,
            transformer,
            cancel: CancelToken::new(),
        })
    }

    /// Token to cancel running extractions from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Compute every point. The time frame is validated once for the
    /// whole batch before any grid file is opened; per-point failures
    /// are recorded in the result table, not propagated.
    pub fn compute(&self, points: &[TurbinePoint]) -> Result<ResultTable> {
        let frame = if self.method.needs_time_frame() {
            let frame = self
                .frame
                .ok_or(PointError::MissingTimeFrame(self.method))?;
            frame.validate_within(&self.config.validity_window)?;
            Some(frame)
        } else {
            None
        };

        let mut sources: SourceMap = HashMap::new();
        for &(variable, storage) in self.method.required_sources() {
            let source = open_source(
                &self.config,
                variable,
                storage,
                frame.as_ref(),
                self.cancel.clone(),
            )?;
            sources.insert((variable, storage), source);
        }

        tracing::info!(
            method = %self.method,
            points = points.len(),
            sources = sources.len(),
            "computing point batch"
        );

        let mut table = ResultTable::new(self.method);
        for point in points {
            let outcome = self.compute_point(point, &sources);
            if let PointOutcome::Failed { stage, error } = &outcome {
                tracing::warn!(point = %point.id, %stage, %error, "point failed");
            }
            table.push(point.id.clone(), outcome);
        }
        Ok(table)
    }

    fn compute_point(&self, point: &TurbinePoint, sources: &SourceMap) -> PointOutcome {
        let mut stage = Stage::Created;
        match self.run_point(point, sources, &mut stage) {
            Ok(result) => PointOutcome::Completed(result),
            Err(error) => PointOutcome::Failed { stage, error },
        }
    }

    fn run_point(
        &self,
        point: &TurbinePoint,
        sources: &SourceMap,
        stage: &mut Stage,
    ) -> Result<PointResult> {
        let projected = self.transformer.transform(point.geo)?;
        *stage = Stage::CoordinateResolved;

        let mut extracted: HashMap<WindVariable, Extraction> = HashMap::new();
        for &key in self.method.required_sources() {
            let value = sources[&key].interpolate_point(
                projected.x,
                projected.y,
                point.hub_height,
                point.interpolation,
            )?;
            extracted.insert(key.0, value);
        }
        *stage = Stage::WindExtracted;

        let curve = self
            .curves
            .get(&point.turbine_type)
            .ok_or_else(|| PointError::MissingPowerCurve(point.turbine_type.clone()))?;

        let result = match self.method {
            CalculationMethod::TimeSeries3km => {
                let wspd = series_of(&extracted, WindVariable::Windspeed)?;
                let rho = series_of(&extracted, WindVariable::AirDensity)?;
                if wspd.len() != rho.len() {
                    return Err(PointError::SeriesMismatch {
                        windspeeds: wspd.len(),
                        densities: rho.len(),
                    });
                }
                let powers =
                    curve.get_power(&wspd.values, &rho.values, InterpolationMethod::Nearest)?;
                PointResult::PowerTimeSeries(ValueSeries::new(wspd.times.clone(), powers))
            }
            CalculationMethod::Mean90Weibull | CalculationMethod::Mean3kmWeibull => {
                let a = scalar_of(&extracted, WindVariable::WeibullA)?;
                let k = scalar_of(&extracted, WindVariable::WeibullK)?;
                let rho = scalar_of(&extracted, WindVariable::AirDensity)?;
                let aep = weibull_aep(curve, a, k, rho, self.config.availability, None)?;
                PointResult::Aep(aep)
            }
            CalculationMethod::Mean90Rayleigh | CalculationMethod::Mean3kmRayleigh => {
                let v_mean = scalar_of(&extracted, WindVariable::Windspeed)?;
                let rho = scalar_of(&extracted, WindVariable::AirDensity)?;
                let aep = rayleigh_aep(curve, v_mean, rho, self.config.availability, None)?;
                PointResult::Aep(aep)
            }
        };
        *stage = Stage::PowerComputed;

        *stage = Stage::Done;
        Ok(result)
    }
}

fn series_of<'a>(
    extracted: &'a HashMap<WindVariable, Extraction>,
    variable: WindVariable,
) -> Result<&'a ValueSeries> {
    extracted[&variable]
        .as_series()
        .ok_or(PointError::ShapeMismatch {
            variable,
            expected: "series",
            got: "scalar",
        })
}

fn scalar_of(extracted: &HashMap<WindVariable, Extraction>, variable: WindVariable) -> Result<f64> {
    extracted[&variable]
        .as_scalar()
        .ok_or(PointError::ShapeMismatch {
            variable,
            expected: "scalar",
            got: "series",
        })
}
