//! Numeric helpers shared by the transforms

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

/// Sort ascending in place.
/// Stable, and uses the IEEE total order so NaN cannot break the sort
/// (negative NaN first, positive NaN last).
pub fn sort_ascending(x: &mut [f64]) {
    x.sort_by(|a, b| a.total_cmp(b));
}

/// Row positions of `x` in ascending value order; ties keep their original order
pub fn argsort(x: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..x.len()).collect();
    order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < 1e-12);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_sort_ascending() {
        let mut x = vec![3.0, -1.0, 2.0, 2.0, 0.0];
        sort_ascending(&mut x);
        assert_eq!(x, vec![-1.0, 0.0, 2.0, 2.0, 3.0]);
    }

    #[test]
    fn test_argsort_is_stable() {
        let x = vec![5.0, 1.0, 5.0, 0.5];
        assert_eq!(argsort(&x), vec![3, 1, 0, 2]);
    }
}
