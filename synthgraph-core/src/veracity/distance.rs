//! Two-sample Kolmogorov–Smirnov statistic.

use std::cmp::Ordering;

/// Returns `sup_x |F_a(x) - F_b(x)|` for the empirical CDFs of `a` and `b`.
///
/// The statistic is symmetric and lies in `[0, 1]`. Two empty samples score
/// `0.0`; exactly one empty sample scores `1.0`.
///
/// # Examples
/// ```
/// use synthgraph_core::ks_statistic;
///
/// assert_eq!(ks_statistic(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), 0.0);
/// assert_eq!(ks_statistic(&[1.0, 1.0], &[5.0]), 1.0);
/// assert_eq!(ks_statistic(&[], &[]), 0.0);
/// ```
#[expect(clippy::cast_precision_loss, reason = "sample sizes become CDF steps")]
#[must_use]
pub fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 0.0,
        (true, false) | (false, true) => return 1.0,
        (false, false) => {}
    }
    let a = sorted(a);
    let b = sorted(b);
    let (len_a, len_b) = (a.len() as f64, b.len() as f64);

    let (mut i, mut j) = (0, 0);
    let mut statistic = 0.0_f64;
    while i < a.len() && j < b.len() {
        let x = match a[i].total_cmp(&b[j]) {
            Ordering::Greater => b[j],
            _ => a[i],
        };
        while i < a.len() && a[i].total_cmp(&x).is_le() {
            i += 1;
        }
        while j < b.len() && b[j].total_cmp(&x).is_le() {
            j += 1;
        }
        statistic = statistic.max((i as f64 / len_a - j as f64 / len_b).abs());
    }
    statistic
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::suite_proptest_config;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case::disjoint(&[1.0, 2.0], &[3.0, 4.0], 1.0)]
    #[case::half(&[1.0, 2.0], &[2.0, 3.0], 0.5)]
    #[case::ties(&[1.0, 1.0, 2.0, 2.0], &[1.0, 2.0], 0.0)]
    #[case::one_empty(&[], &[1.0], 1.0)]
    #[case::both_empty(&[], &[], 0.0)]
    fn known_statistics(#[case] a: &[f64], #[case] b: &[f64], #[case] expected: f64) {
        assert!((ks_statistic(a, b) - expected).abs() < 1e-12);
    }

    fn sample() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-1_000.0_f64..1_000.0, 0..60)
    }

    proptest! {
        #![proptest_config(suite_proptest_config(128))]

        #[test]
        fn statistic_is_symmetric_and_bounded(a in sample(), b in sample()) {
            let forward = ks_statistic(&a, &b);
            prop_assert_eq!(forward, ks_statistic(&b, &a));
            prop_assert!((0.0..=1.0).contains(&forward));
        }

        #[test]
        fn identical_samples_score_zero(a in sample(), seed in any::<u64>()) {
            use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};

            let mut shuffled = a.clone();
            shuffled.shuffle(&mut SmallRng::seed_from_u64(seed));
            prop_assert_eq!(ks_statistic(&a, &shuffled), 0.0);
        }
    }
}
