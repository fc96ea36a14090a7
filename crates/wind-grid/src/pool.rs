//! Bounded worker pool for per-year parallel extraction.
//!
//! Each worker loads one year's sub-grid fully into memory and runs
//! the same interpolation on it. The pool is joined before any
//! result is returned; the per-year results are then concatenated in
//! ascending year order, never in pool completion order. One failing
//! year aborts the whole operation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::{GridError, Result};

/// Resource bounds for one parallel extraction.
#[derive(Debug, Clone)]
pub struct ExtractionLimits {
    /// Number of pool workers.
    pub workers: usize,
    /// Optional wall-clock deadline for the whole extraction.
    pub deadline: Option<Duration>,
}

impl ExtractionLimits {
    pub fn new(workers: usize, deadline: Option<Duration>) -> Self {
        Self {
            workers: workers.max(1),
            deadline,
        }
    }
}

/// Cooperative cancellation flag, checked before each year's load.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Run `extract` for every year on a bounded pool and return the
/// results in ascending year order.
///
/// `years` must be sorted ascending by the caller; results keep that
/// order regardless of completion order because the mapping is
/// index-preserving. The pool is drained before returning. Any
/// single failure aborts the operation with no partial results.
pub fn extract_years<T, F>(
    years: &[i32],
    limits: &ExtractionLimits,
    cancel: &CancelToken,
    extract: F,
) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(i32) -> Result<T> + Sync,
{
    debug_assert!(years.windows(2).all(|w| w[0] < w[1]), "years must ascend");

    let started = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(limits.workers)
        .build()
        .map_err(|e| GridError::InvalidMetadata(format!("failed to build worker pool: {e}")))?;

    tracing::debug!(
        years = years.len(),
        workers = limits.workers,
        "starting per-year extraction"
    );

    pool.install(|| {
        years
            .par_iter()
            .map(|&year| {
                if cancel.is_cancelled() {
                    return Err(GridError::Cancelled);
                }
                if let Some(deadline) = limits.deadline {
                    if started.elapsed() > deadline {
                        return Err(GridError::DeadlineExceeded(deadline));
                    }
                }
                extract(year).map_err(|e| GridError::YearFailed {
                    year,
                    source: Box::new(e),
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_keep_year_order() {
        let years: Vec<i32> = (2009..=2018).collect();
        let limits = ExtractionLimits::new(4, None);

        let results = extract_years(&years, &limits, &CancelToken::new(), |year| {
            // Vary work per year so completion order differs from
            // submission order.
            std::thread::sleep(Duration::from_millis((2018 - year) as u64));
            Ok(year * 10)
        })
        .unwrap();

        let expected: Vec<i32> = years.iter().map(|y| y * 10).collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn test_single_failure_aborts_all() {
        let years: Vec<i32> = (2009..=2012).collect();
        let limits = ExtractionLimits::new(2, None);

        let result: Result<Vec<i32>> =
            extract_years(&years, &limits, &CancelToken::new(), |year| {
                if year == 2011 {
                    Err(GridError::InvalidMetadata("boom".to_string()))
                } else {
                    Ok(year)
                }
            });

        match result {
            Err(GridError::YearFailed { year, .. }) => assert_eq!(year, 2011),
            other => panic!("expected YearFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_cancellation_aborts() {
        let years: Vec<i32> = (2009..=2018).collect();
        let limits = ExtractionLimits::new(1, None);
        let cancel = CancelToken::new();
        cancel.cancel();

        let result: Result<Vec<i32>> = extract_years(&years, &limits, &cancel, Ok);
        assert!(matches!(result, Err(GridError::Cancelled)));
    }

    #[test]
    fn test_elapsed_deadline_aborts() {
        let years: Vec<i32> = (2009..=2018).collect();
        let limits = ExtractionLimits::new(1, Some(Duration::ZERO));

        let result: Result<Vec<i32>> =
            extract_years(&years, &limits, &CancelToken::new(), |year| {
                std::thread::sleep(Duration::from_millis(1));
                Ok(year)
            });
        assert!(matches!(result, Err(GridError::DeadlineExceeded(_))));
    }
}
