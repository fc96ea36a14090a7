//! 1-D resampling helpers for curve regridding.
//!
//! Catmull-Rom cubic through the raw samples, with the stencil
//! clamped at the ends so the curve still passes through every node.
//! Degenerates to linear when fewer than four samples exist.

/// Fractional index of `target` on an ascending axis, clamped to the
/// axis extents.
fn frac_index(axis: &[f64], target: f64) -> f64 {
    let last = axis.len() - 1;
    let t = target.clamp(axis[0], axis[last]);
    let hi = axis.partition_point(|&a| a <= t);
    if hi == 0 {
        return 0.0;
    }
    if hi > last {
        return last as f64;
    }
    let lo = hi - 1;
    lo as f64 + (t - axis[lo]) / (axis[hi] - axis[lo])
}

fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

fn cubic_1d(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    ((a * t + b) * t + c) * t + p1
}

fn sample(axis: &[f64], values: &[f64], target: f64) -> f64 {
    debug_assert_eq!(axis.len(), values.len());

    if axis.len() == 1 {
        return values[0];
    }

    let f = frac_index(axis, target);
    let cell = (f.floor() as usize).min(axis.len() - 2);
    let t = f - cell as f64;

    if axis.len() < 4 {
        return values[cell] * (1.0 - t) + values[cell + 1] * t;
    }

    let at = |i: isize| values[clamp_index(i, values.len())];
    let anchor = cell as isize - 1;
    cubic_1d(at(anchor), at(anchor + 1), at(anchor + 2), at(anchor + 3), t)
}

/// Resample `values` (defined on `axis`) at every target position.
pub(crate) fn resample(axis: &[f64], values: &[f64], targets: &[f64]) -> Vec<f64> {
    targets.iter().map(|&t| sample(axis, values, t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_reproduced() {
        let axis = vec![2.0, 3.0, 4.0, 5.0, 6.0];
        let values = vec![0.0, 50.0, 300.0, 800.0, 1200.0];

        let out = resample(&axis, &values, &axis);
        for (a, b) in out.iter().zip(&values) {
            assert!((a - b).abs() < 1e-9, "{a} != {b}");
        }
    }

    #[test]
    fn test_linear_fallback_for_short_curves() {
        let axis = vec![0.0, 2.0];
        let values = vec![0.0, 10.0];
        let out = resample(&axis, &values, &[1.0]);
        assert!((out[0] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_smooth_between_nodes() {
        // A cubic polynomial is reproduced exactly by Catmull-Rom on
        // its interior cells only in the linear case; here we just
        // require monotone data to stay inside the hull neighborhood.
        let axis: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let values: Vec<f64> = axis.iter().map(|x| x * x).collect();
        let out = resample(&axis, &values, &[2.5]);
        assert!((out[0] - 6.25).abs() < 0.5);
    }
}
