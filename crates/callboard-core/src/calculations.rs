//! Numeric helpers shared by every displayed metric.
//!
//! All "round to nearest integer" operations in Callboard go through
//! [`round_half_to_even`] so that re-runs on identical input reproduce the
//! same figures regardless of call site.

// ── Rounding ──────────────────────────────────────────────────────────────────

/// Round to the nearest integer, breaking ties toward the even neighbour
/// (banker's rounding).
///
/// Ties-to-even keeps repeated re-aggregation from drifting metrics upward
/// and is the one rounding rule used for every displayed figure.
pub fn round_half_to_even(value: f64) -> i64 {
    let floor = value.floor();
    let diff = value - floor;
    if diff > 0.5 {
        floor as i64 + 1
    } else if diff < 0.5 {
        floor as i64
    } else {
        let f = floor as i64;
        if f % 2 == 0 {
            f
        } else {
            f + 1
        }
    }
}

// ── Aggregate arithmetic ──────────────────────────────────────────────────────

/// Arithmetic mean of `values`, or `None` when the iterator is empty.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0u64;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// `part` as a percentage of `whole`, or `None` when `whole` is zero.
pub fn percent(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 * 100.0 / whole as f64)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── round_half_to_even ────────────────────────────────────────────────────

    #[test]
    fn test_round_plain_cases() {
        assert_eq!(round_half_to_even(12.3), 12);
        assert_eq!(round_half_to_even(12.7), 13);
        assert_eq!(round_half_to_even(0.0), 0);
        assert_eq!(round_half_to_even(-3.2), -3);
        assert_eq!(round_half_to_even(-3.8), -4);
    }

    #[test]
    fn test_round_ties_go_to_even() {
        assert_eq!(round_half_to_even(0.5), 0);
        assert_eq!(round_half_to_even(1.5), 2);
        assert_eq!(round_half_to_even(2.5), 2);
        assert_eq!(round_half_to_even(3.5), 4);
        assert_eq!(round_half_to_even(-0.5), 0);
        assert_eq!(round_half_to_even(-1.5), -2);
        assert_eq!(round_half_to_even(-2.5), -2);
    }

    // ── mean ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_mean_of_values() {
        assert_eq!(mean(vec![2.0, 4.0, 6.0]), Some(4.0));
        assert_eq!(mean(vec![7.5]), Some(7.5));
    }

    #[test]
    fn test_mean_empty_is_none() {
        assert_eq!(mean(Vec::<f64>::new()), None);
    }

    // ── percent ───────────────────────────────────────────────────────────────

    #[test]
    fn test_percent_of_whole() {
        assert_eq!(percent(1, 2), Some(50.0));
        assert_eq!(percent(0, 4), Some(0.0));
        assert_eq!(percent(3, 3), Some(100.0));
    }

    #[test]
    fn test_percent_zero_denominator_is_none() {
        assert_eq!(percent(0, 0), None);
        assert_eq!(percent(5, 0), None);
    }
}
