//! Statistics over detection histograms.
//!
//! Used to compare an accumulated histogram against the analytic curve from
//! [`theoretical_profile`](crate::wave::theoretical_profile), and to smooth the
//! histogram for the intensity graph.

/// Scale values so the largest becomes 1. All-zero input stays all zero.
pub fn normalized<T: Copy + Into<f64>>(values: &[T]) -> Vec<f64> {
    let max = values.iter().map(|&v| v.into()).fold(0.0, f64::max);
    if max <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|&v| v.into() / max).collect()
}

/// Pearson correlation of two equally long series.
///
/// Returns 0 when the lengths differ, the input is empty, or either series
/// is constant.
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a <= f64::EPSILON || var_b <= f64::EPSILON {
        return 0.0;
    }
    (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0)
}

/// Michelson contrast, `(max - min) / (max + min)`.
pub fn contrast(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    if values.is_empty() || max + min <= 0.0 {
        0.0
    } else {
        (max - min) / (max + min)
    }
}

/// Centered moving average with `window` samples on each side.
///
/// The window shrinks at the edges instead of padding.
pub fn smooth<T: Copy + Into<f64>>(values: &[T], window: usize) -> Vec<f64> {
    let len = values.len();
    (0..len)
        .map(|i| {
            let start = i.saturating_sub(window);
            let end = (i + window).min(len - 1);
            let slice = &values[start..=end];
            slice.iter().map(|&v| v.into()).sum::<f64>() / slice.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized() {
        assert_eq!(normalized(&[1u32, 2, 4]), vec![0.25, 0.5, 1.0]);
        assert_eq!(normalized(&[0u32, 0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_correlation_extremes() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        let c = [4.0, 3.0, 2.0, 1.0];
        assert!((correlation(&a, &b) - 1.0).abs() < 1e-12);
        assert!((correlation(&a, &c) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_degenerate_inputs() {
        assert_eq!(correlation(&[], &[]), 0.0);
        assert_eq!(correlation(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(correlation(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_contrast() {
        assert_eq!(contrast(&[1.0, 3.0]), 0.5);
        assert_eq!(contrast(&[0.0, 0.0]), 0.0);
        assert_eq!(contrast(&[]), 0.0);
    }

    #[test]
    fn test_smooth_shrinks_window_at_edges() {
        let smoothed = smooth(&[0u32, 0, 9, 0, 0], 1);
        assert_eq!(smoothed, vec![0.0, 3.0, 3.0, 3.0, 0.0]);
        assert!(smooth::<u32>(&[], 3).is_empty());
    }
}
