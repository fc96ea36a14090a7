//! Synthetic data generators.

/// CF time axis for `n` hourly steps starting at midnight, January
/// 1st of `year`. Returns the units string and the hour offsets.
pub fn hourly_times(year: i32, n: usize) -> (String, Vec<f64>) {
    let units = format!("hours since {year}-01-01 00:00:00");
    let offsets = (0..n).map(|h| h as f64).collect();
    (units, offsets)
}

/// Fill a `[time][level][y][x]` cube from an index function.
pub fn cube(
    nt: usize,
    nl: usize,
    ny: usize,
    nx: usize,
    f: impl Fn(usize, usize, usize, usize) -> f32,
) -> Vec<f32> {
    let mut data = Vec::with_capacity(nt.max(1) * nl.max(1) * ny * nx);
    for t in 0..nt.max(1) {
        for l in 0..nl.max(1) {
            for j in 0..ny {
                for i in 0..nx {
                    data.push(f(t, l, j, i));
                }
            }
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hourly_times() {
        let (units, offsets) = hourly_times(2012, 3);
        assert_eq!(units, "hours since 2012-01-01 00:00:00");
        assert_eq!(offsets, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_cube_shape() {
        let data = cube(2, 0, 3, 4, |t, _, j, i| (t * 100 + j * 10 + i) as f32);
        assert_eq!(data.len(), 2 * 3 * 4);
        assert_eq!(data[0], 0.0);
        assert_eq!(data[12], 100.0);
    }
}
