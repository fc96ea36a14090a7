//! Interpolation along grid axes.
//!
//! Targets are given in axis coordinates (meters for x/y). They are
//! first converted to a fractional index inside the axis, then the
//! stencil methods operate in index space. Only `nearest` is defined
//! outside the axis extents; every other method yields NaN there and
//! the caller escalates that to a fatal data-quality error.

use atlas_common::InterpolationMethod;

/// Fractional index of `target` within an ascending axis, or `None`
/// when the target lies outside `[axis[0], axis[n-1]]`.
pub fn fractional_index(axis: &[f64], target: f64) -> Option<f64> {
    let n = axis.len();
    if n == 0 || target < axis[0] || target > axis[n - 1] {
        return None;
    }
    if n == 1 {
        return Some(0.0);
    }

    // partition_point finds the first axis value > target.
    let hi = axis.partition_point(|&v| v <= target).min(n - 1);
    let lo = hi - 1;
    if target >= axis[hi] {
        return Some(hi as f64);
    }

    let span = axis[hi] - axis[lo];
    if span <= 0.0 {
        return Some(lo as f64);
    }
    Some(lo as f64 + (target - axis[lo]) / span)
}

/// Index of the axis value nearest to `target`, clamped to the axis
/// extents.
pub fn nearest_index(axis: &[f64], target: f64) -> usize {
    debug_assert!(!axis.is_empty());
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &v) in axis.iter().enumerate() {
        let dist = (v - target).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Interpolate a 2-D plane at coordinate target (tx, ty).
///
/// `get(j, i)` returns the plane value at row `j` (y axis) and
/// column `i` (x axis). NaN stencil values propagate to the result.
pub fn interp_plane<F>(
    xs: &[f64],
    ys: &[f64],
    get: F,
    tx: f64,
    ty: f64,
    method: InterpolationMethod,
) -> f64
where
    F: Fn(usize, usize) -> f64,
{
    if let InterpolationMethod::Nearest = method {
        return get(nearest_index(ys, ty), nearest_index(xs, tx));
    }

    let (fi, fj) = match (fractional_index(xs, tx), fractional_index(ys, ty)) {
        (Some(fi), Some(fj)) => (fi, fj),
        _ => return f64::NAN,
    };

    match method {
        InterpolationMethod::Nearest => unreachable!("handled above"),
        InterpolationMethod::Linear => bilinear(xs.len(), ys.len(), &get, fi, fj),
        InterpolationMethod::Quadratic => {
            separable(xs.len(), ys.len(), &get, fi, fj, 3, quadratic_1d)
        }
        InterpolationMethod::Cubic => separable(xs.len(), ys.len(), &get, fi, fj, 4, cubic_1d),
    }
}

/// Interpolate a 1-D series at coordinate `target`.
pub fn interp_series(axis: &[f64], values: &[f64], target: f64, method: InterpolationMethod) -> f64 {
    if let InterpolationMethod::Nearest = method {
        return values[nearest_index(axis, target)];
    }

    let f = match fractional_index(axis, target) {
        Some(f) => f,
        None => return f64::NAN,
    };

    let n = values.len();
    match method {
        InterpolationMethod::Nearest => unreachable!("handled above"),
        InterpolationMethod::Linear => {
            let i0 = (f.floor() as usize).min(n - 1);
            let i1 = (i0 + 1).min(n - 1);
            let t = f - i0 as f64;
            values[i0] * (1.0 - t) + values[i1] * t
        }
        InterpolationMethod::Quadratic => stencil_1d(values, f, 3, quadratic_1d),
        InterpolationMethod::Cubic => stencil_1d(values, f, 4, cubic_1d),
    }
}

fn bilinear<F>(nx: usize, ny: usize, get: &F, fi: f64, fj: f64) -> f64
where
    F: Fn(usize, usize) -> f64,
{
    let i0 = (fi.floor() as usize).min(nx - 1);
    let j0 = (fj.floor() as usize).min(ny - 1);
    let i1 = (i0 + 1).min(nx - 1);
    let j1 = (j0 + 1).min(ny - 1);

    let tx = fi - i0 as f64;
    let ty = fj - j0 as f64;

    let v00 = get(j0, i0);
    let v10 = get(j0, i1);
    let v01 = get(j1, i0);
    let v11 = get(j1, i1);

    let top = v00 * (1.0 - tx) + v10 * tx;
    let bottom = v01 * (1.0 - tx) + v11 * tx;
    top * (1.0 - ty) + bottom * ty
}

/// Separable stencil interpolation: interpolate each stencil row
/// along x, then the row results along y. Sample indices outside the
/// grid are clamped to the edge, so the offset stays within the
/// kernel's interpolating interval everywhere.
fn separable<F>(
    nx: usize,
    ny: usize,
    get: &F,
    fi: f64,
    fj: f64,
    width: usize,
    kernel: fn(&[f64], f64) -> f64,
) -> f64
where
    F: Fn(usize, usize) -> f64,
{
    let (xi, xt) = stencil_anchor(fi, width);
    let (yj, yt) = stencil_anchor(fj, width);

    let mut rows = [0.0f64; 4];
    let mut cols = [0.0f64; 4];
    for (r, row) in rows.iter_mut().enumerate().take(width) {
        let j = clamp_index(yj + r as isize, ny);
        for (c, col) in cols.iter_mut().enumerate().take(width) {
            let i = clamp_index(xi + c as isize, nx);
            *col = get(j, i);
        }
        *row = kernel(&cols[..width], xt);
    }

    kernel(&rows[..width], yt)
}

fn stencil_1d(values: &[f64], f: f64, width: usize, kernel: fn(&[f64], f64) -> f64) -> f64 {
    let (start, t) = stencil_anchor(f, width);
    let mut p = [0.0f64; 4];
    for (c, v) in p.iter_mut().enumerate().take(width) {
        *v = values[clamp_index(start + c as isize, values.len())];
    }
    kernel(&p[..width], t)
}

/// Start index (possibly negative, clamped per sample later) and the
/// kernel offset for a stencil anchored at the cell containing `f`.
/// Catmull-Rom (width 4) interpolates between its middle two
/// samples; the quadratic kernel is anchored at its first.
fn stencil_anchor(f: f64, width: usize) -> (isize, f64) {
    let cell = f.floor() as isize;
    if width == 4 {
        (cell - 1, f - cell as f64)
    } else {
        (cell, f - cell as f64)
    }
}

fn clamp_index(i: isize, n: usize) -> usize {
    i.clamp(0, n as isize - 1) as usize
}

/// 1-D cubic interpolation using a Catmull-Rom spline over four
/// samples; `t` is the offset from the second sample.
fn cubic_1d(p: &[f64], t: f64) -> f64 {
    debug_assert_eq!(p.len(), 4);
    let t2 = t * t;
    let t3 = t2 * t;

    let a = -0.5 * p[0] + 1.5 * p[1] - 1.5 * p[2] + 0.5 * p[3];
    let b = p[0] - 2.5 * p[1] + 2.0 * p[2] - 0.5 * p[3];
    let c = -0.5 * p[0] + 0.5 * p[2];
    let d = p[1];

    a * t3 + b * t2 + c * t + d
}

/// 1-D quadratic interpolation through three samples (Lagrange);
/// `t` is the offset from the first sample.
fn quadratic_1d(p: &[f64], t: f64) -> f64 {
    debug_assert_eq!(p.len(), 3);
    let l0 = (t - 1.0) * (t - 2.0) / 2.0;
    let l1 = -t * (t - 2.0);
    let l2 = t * (t - 1.0) / 2.0;
    p[0] * l0 + p[1] * l1 + p[2] * l2
}
