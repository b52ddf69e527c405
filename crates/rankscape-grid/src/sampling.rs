//! Evenly spaced sampling.

/// `n` evenly spaced samples from `start` to `end`, both inclusive.
///
/// Returns an empty vector for `n == 0` and `[start]` for `n == 1`. The last
/// sample is exactly `end`.
///
/// ```
/// use rankscape_grid::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// ```
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = end;
            values
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(-3600.0, 3600.0, 100);
        assert_eq!(v.len(), 100);
        assert_eq!(v[0], -3600.0);
        assert_eq!(v[99], 3600.0);
    }

    #[test]
    fn test_linspace_evenly_spaced() {
        let v = linspace(0.0, 10.0, 11);
        for (i, x) in v.iter().enumerate() {
            assert!((x - i as f64).abs() < 1e-12);
        }
    }

    #[test]
    fn test_linspace_degenerate() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.5, 9.0, 1), vec![2.5]);
        assert_eq!(linspace(4.0, 4.0, 3), vec![4.0, 4.0, 4.0]);
    }
}
