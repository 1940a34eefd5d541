//! Savitzky-Golay smoothing with a five-point window and a quadratic fit.

/// Window length in samples.
pub const WINDOW: usize = 5;

/// Least-squares quadratic through `window` (offsets `-2..=2`), evaluated at `t`.
fn quadratic_at(window: &[f64], t: f64) -> f64 {
    let (mut s0, mut s1, mut s2) = (0.0, 0.0, 0.0);
    for (i, y) in window.iter().enumerate() {
        let x = i as f64 - 2.0;
        s0 += y;
        s1 += x * y;
        s2 += x * x * y;
    }
    // Normal equations for x = -2..=2: sum(x^2) = 10, sum(x^4) = 34.
    let a0 = (34.0 * s0 - 10.0 * s2) / 70.0;
    let a1 = s1 / 10.0;
    let a2 = (5.0 * s2 - 10.0 * s0) / 70.0;
    a0 + a1 * t + a2 * t * t
}

/// Smooth `values`, returning them unchanged when shorter than [`WINDOW`].
///
/// Interior points use the centred window. The first and last two points are
/// read off the fit of the first and last full window.
pub fn smooth(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n < WINDOW {
        return values.to_vec();
    }

    let head = &values[..WINDOW];
    let tail = &values[n - WINDOW..];

    let mut out = Vec::with_capacity(n);
    out.push(quadratic_at(head, -2.0));
    out.push(quadratic_at(head, -1.0));
    for centre in 2..n - 2 {
        out.push(quadratic_at(&values[centre - 2..=centre + 2], 0.0));
    }
    out.push(quadratic_at(tail, 1.0));
    out.push(quadratic_at(tail, 2.0));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_short_series_unchanged() {
        assert_eq!(smooth(&[1.0, 5.0, 2.0, 8.0]), vec![1.0, 5.0, 2.0, 8.0]);
        assert!(smooth(&[]).is_empty());
    }

    #[test]
    fn test_quadratic_is_preserved() {
        let values: Vec<f64> = (0..8).map(|i| (i * i) as f64 - 3.0 * i as f64).collect();
        assert_close(&smooth(&values), &values);
    }

    #[test]
    fn test_centre_weights() {
        // Centre coefficients are (-3, 12, 17, 12, -3) / 35.
        let smoothed = smooth(&[0.0, 0.0, 35.0, 0.0, 0.0, 0.0, 0.0]);
        assert!((smoothed[2] - 17.0).abs() < 1e-9);
        assert!((smoothed[3] - 12.0).abs() < 1e-9);
        assert!((smoothed[4] + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_window_uses_one_fit() {
        let values = [2.0, 4.0, 3.0, 5.0, 4.0];
        let smoothed = smooth(&values);
        for (t, s) in [-2.0, -1.0, 0.0, 1.0, 2.0].iter().zip(&smoothed) {
            assert!((quadratic_at(&values, *t) - s).abs() < 1e-12);
        }
    }
}
