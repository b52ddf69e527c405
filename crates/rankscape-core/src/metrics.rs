//! Ranking quality metrics.
//!
//! All metrics compare an *expected* ordering of ids with the *actual*
//! ordering produced by a sort. Ids that appear in only one of the lists
//! are ignored by [`kendall_tau`]; [`ndcg`] and [`reciprocal_rank`] treat
//! them as irrelevant results.

use std::collections::HashMap;

/// Kendall rank correlation (τ-a) between two orderings.
///
/// Only ids present in both lists are compared. Returns `None` when fewer
/// than two ids are shared, since no pair can be ordered.
///
/// `1.0` means identical order, `-1.0` exactly reversed.
pub fn kendall_tau<S: AsRef<str>, T: AsRef<str>>(expected: &[S], actual: &[T]) -> Option<f64> {
    let actual_pos: HashMap<&str, usize> = actual
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_ref(), i))
        .collect();

    let positions: Vec<usize> = expected
        .iter()
        .filter_map(|id| actual_pos.get(id.as_ref()).copied())
        .collect();

    let n = positions.len();
    if n < 2 {
        return None;
    }

    let mut concordant = 0i64;
    let mut discordant = 0i64;
    for i in 0..n {
        for j in (i + 1)..n {
            if positions[i] < positions[j] {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }

    let pairs = (n * (n - 1) / 2) as f64;
    Some((concordant - discordant) as f64 / pairs)
}

/// Normalized discounted cumulative gain at `k`.
///
/// Relevance is graded from the expected order: the first of `n` expected
/// ids has relevance `n`, the last has relevance `1`, anything else `0`.
/// Returns `1.0` when nothing is expected.
pub fn ndcg<S: AsRef<str>, T: AsRef<str>>(expected: &[S], actual: &[T], k: usize) -> f64 {
    let n = expected.len();
    if n == 0 || k == 0 {
        return 1.0;
    }

    let relevance: HashMap<&str, f64> = expected
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_ref(), (n - i) as f64))
        .collect();

    let dcg: f64 = actual
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, id)| relevance.get(id.as_ref()).copied().unwrap_or(0.0) / discount(i))
        .sum();

    let ideal: f64 = (0..n.min(k)).map(|i| (n - i) as f64 / discount(i)).sum();

    if ideal == 0.0 { 1.0 } else { dcg / ideal }
}

fn discount(position: usize) -> f64 {
    ((position + 2) as f64).log2()
}

/// Reciprocal rank of `target` in `actual` (`1 / position`, 1-based).
///
/// Returns `0.0` when `target` does not appear.
pub fn reciprocal_rank<T: AsRef<str>>(target: &str, actual: &[T]) -> f64 {
    actual
        .iter()
        .position(|id| id.as_ref() == target)
        .map(|i| 1.0 / (i + 1) as f64)
        .unwrap_or(0.0)
}
