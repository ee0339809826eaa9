//! Numerical hypothesis-test routines.
//!
//! Each routine takes already-cleaned samples (missing values dropped by the
//! caller) and returns a raw statistic and two-sided p-value. Degenerate
//! input is an error here; deciding whether a test runs at all is the
//! selector's job in [`crate::stats`].

use std::cmp::Ordering;

use statrs::distribution::{
    ChiSquared, ContinuousCDF, Discrete, FisherSnedecor, Hypergeometric, Normal, StudentsT,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatError {
    #[error("sample is empty after dropping missing values")]
    EmptySample,
    #[error("need at least {min} observations per sample, got {actual}")]
    TooFewObservations { min: usize, actual: usize },
    #[error("input has zero variance")]
    ZeroVariance,
    #[error("all paired differences are zero")]
    ZeroDifferences,
    #[error("distribution parameters are degenerate: {0}")]
    Distribution(String),
}

/// Raw outcome of one test, before record normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestOutcome {
    pub statistic: f64,
    pub p_value: f64,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sum_sq_dev(values: &[f64], center: f64) -> f64 {
    values.iter().map(|v| (v - center).powi(2)).sum()
}

fn standard_normal() -> Result<Normal, StatError> {
    Normal::new(0.0, 1.0).map_err(|e| StatError::Distribution(e.to_string()))
}

/// Midranks: 1-based ranks with ties assigned their average rank.
pub(crate) fn midranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        // Average of the 1-based ranks start+1..=end+1.
        let rank = (start + end + 2) as f64 / 2.0;
        for &index in &order[start..=end] {
            ranks[index] = rank;
        }
        start = end + 1;
    }
    ranks
}

/// Sum of `t^3 - t` over tied groups, used by the rank-test variance
/// corrections.
fn tie_term(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mut term = 0.0;
    let mut start = 0;
    while start < sorted.len() {
        let mut end = start;
        while end + 1 < sorted.len() && sorted[end + 1] == sorted[start] {
            end += 1;
        }
        let ties = (end - start + 1) as f64;
        term += ties.powi(3) - ties;
        start = end + 1;
    }
    term
}

/// Independent two-sample t-test with pooled variance, two-sided.
pub fn students_t_test(a: &[f64], b: &[f64]) -> Result<TestOutcome, StatError> {
    let n1 = a.len();
    let n2 = b.len();
    if n1 < 2 || n2 < 2 {
        return Err(StatError::TooFewObservations {
            min: 2,
            actual: n1.min(n2),
        });
    }
    let mean1 = mean(a);
    let mean2 = mean(b);
    let df = (n1 + n2 - 2) as f64;
    let pooled_var = (sum_sq_dev(a, mean1) + sum_sq_dev(b, mean2)) / df;
    let se = (pooled_var * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
    if se == 0.0 {
        return Err(StatError::ZeroVariance);
    }
    let t = (mean1 - mean2) / se;
    let dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| StatError::Distribution(e.to_string()))?;
    let p_value = (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0);
    Ok(TestOutcome {
        statistic: t,
        p_value,
    })
}

/// Mann-Whitney U rank-sum test, two-sided, normal approximation with
/// midrank tie correction and continuity correction. The statistic is U for
/// the first sample.
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> Result<TestOutcome, StatError> {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    if a.is_empty() || b.is_empty() {
        return Err(StatError::EmptySample);
    }
    let mut combined = Vec::with_capacity(a.len() + b.len());
    combined.extend_from_slice(a);
    combined.extend_from_slice(b);
    let ranks = midranks(&combined);
    let rank_sum1: f64 = ranks[..a.len()].iter().sum();
    let u1 = rank_sum1 - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;
    let n = n1 + n2;
    let tie = tie_term(&combined);
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie / (n * (n - 1.0)));
    if variance <= 0.0 || !variance.is_finite() {
        return Err(StatError::ZeroVariance);
    }
    let mean_u = n1 * n2 / 2.0;
    let z = (u1.max(u2) - mean_u - 0.5) / variance.sqrt();
    let normal = standard_normal()?;
    let p_value = (2.0 * (1.0 - normal.cdf(z))).clamp(0.0, 1.0);
    Ok(TestOutcome {
        statistic: u1,
        p_value,
    })
}

/// Wilcoxon signed-rank test on positionally paired samples, two-sided,
/// normal approximation. Zero differences are dropped; the statistic is
/// `min(T+, T-)`.
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64]) -> Result<TestOutcome, StatError> {
    debug_assert_eq!(x.len(), y.len());
    let differences: Vec<f64> = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| xi - yi)
        .filter(|d| *d != 0.0)
        .collect();
    if differences.is_empty() {
        return Err(StatError::ZeroDifferences);
    }
    let magnitudes: Vec<f64> = differences.iter().map(|d| d.abs()).collect();
    let ranks = midranks(&magnitudes);
    let t_plus: f64 = differences
        .iter()
        .zip(&ranks)
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| r)
        .sum();
    let n = differences.len() as f64;
    let t_minus = n * (n + 1.0) / 2.0 - t_plus;
    let statistic = t_plus.min(t_minus);
    let variance = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - tie_term(&magnitudes) / 48.0;
    if variance <= 0.0 {
        return Err(StatError::ZeroVariance);
    }
    let z = (statistic - n * (n + 1.0) / 4.0) / variance.sqrt();
    let normal = standard_normal()?;
    let p_value = (2.0 * (1.0 - normal.cdf(z.abs()))).clamp(0.0, 1.0);
    Ok(TestOutcome {
        statistic,
        p_value,
    })
}

/// One-way ANOVA F-test across two or more groups.
pub fn one_way_anova(groups: &[Vec<f64>]) -> Result<TestOutcome, StatError> {
    if groups.len() < 2 {
        return Err(StatError::TooFewObservations {
            min: 2,
            actual: groups.len(),
        });
    }
    if groups.iter().any(|g| g.is_empty()) {
        return Err(StatError::EmptySample);
    }
    let total: usize = groups.iter().map(|g| g.len()).sum();
    let df_between = (groups.len() - 1) as f64;
    let df_within = (total - groups.len()) as f64;
    if df_within <= 0.0 {
        return Err(StatError::TooFewObservations {
            min: groups.len() + 1,
            actual: total,
        });
    }
    let grand_mean = groups.iter().flatten().sum::<f64>() / total as f64;
    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let group_mean = mean(group);
        ss_between += group.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += sum_sq_dev(group, group_mean);
    }
    if ss_within == 0.0 {
        return Err(StatError::ZeroVariance);
    }
    let f = (ss_between / df_between) / (ss_within / df_within);
    let dist = FisherSnedecor::new(df_between, df_within)
        .map_err(|e| StatError::Distribution(e.to_string()))?;
    let p_value = (1.0 - dist.cdf(f)).clamp(0.0, 1.0);
    Ok(TestOutcome {
        statistic: f,
        p_value,
    })
}

/// Chi-square test of independence on a contingency table of counts, with
/// Yates continuity correction when the table has one degree of freedom.
pub fn chi_square_independence(observed: &[Vec<f64>]) -> Result<TestOutcome, StatError> {
    let rows = observed.len();
    let cols = observed.first().map_or(0, Vec::len);
    if rows < 2 || cols < 2 {
        return Err(StatError::TooFewObservations {
            min: 2,
            actual: rows.min(cols),
        });
    }
    let mut row_totals = vec![0.0; rows];
    let mut col_totals = vec![0.0; cols];
    let mut total = 0.0;
    for (i, row) in observed.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            row_totals[i] += value;
            col_totals[j] += value;
            total += value;
        }
    }
    if total <= 0.0 {
        return Err(StatError::EmptySample);
    }
    let df = ((rows - 1) * (cols - 1)) as f64;
    let yates = df == 1.0;
    let mut statistic = 0.0;
    for (i, row) in observed.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            let expected = row_totals[i] * col_totals[j] / total;
            if expected <= 0.0 {
                continue;
            }
            let observed_value = if yates {
                // Move each count half a unit toward its expectation.
                value + 0.5 * (expected - value).signum()
            } else {
                value
            };
            let deviation = observed_value - expected;
            statistic += deviation * deviation / expected;
        }
    }
    let dist = ChiSquared::new(df).map_err(|e| StatError::Distribution(e.to_string()))?;
    let p_value = (1.0 - dist.cdf(statistic)).clamp(0.0, 1.0);
    Ok(TestOutcome {
        statistic,
        p_value,
    })
}

/// Fisher's exact test on a 2x2 contingency table. The statistic is the
/// sample odds ratio; the p-value is the two-sided sum of hypergeometric
/// probabilities no larger than the observed table's.
pub fn fisher_exact(table: [[u64; 2]; 2]) -> Result<TestOutcome, StatError> {
    let [[a, b], [c, d]] = table;
    let population = a + b + c + d;
    if population == 0 {
        return Err(StatError::EmptySample);
    }
    let odds_ratio = (a * d) as f64 / (b * c) as f64;
    let successes = a + b;
    let draws = a + c;
    let dist = Hypergeometric::new(population, successes, draws)
        .map_err(|e| StatError::Distribution(e.to_string()))?;
    let observed_pmf = dist.pmf(a);
    let low = draws.saturating_sub(population - successes);
    let high = successes.min(draws);
    let cutoff = observed_pmf * (1.0 + 1e-7);
    let p_value = (low..=high)
        .map(|k| dist.pmf(k))
        .filter(|&p| p <= cutoff)
        .sum::<f64>()
        .clamp(0.0, 1.0);
    Ok(TestOutcome {
        statistic: odds_ratio,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midranks_average_ties() {
        let ranks = midranks(&[10.0, 20.0, 20.0, 30.0]);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
    }

    #[test]
    fn tie_term_counts_groups() {
        // One pair and one triple: (2^3 - 2) + (3^3 - 3) = 30.
        assert_eq!(tie_term(&[1.0, 1.0, 2.0, 2.0, 2.0, 3.0]), 30.0);
    }

    #[test]
    fn t_test_matches_known_value() {
        let outcome =
            students_t_test(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
        assert!((outcome.statistic - (-1.8974)).abs() < 1e-3);
        assert!((outcome.p_value - 0.0943).abs() < 1e-3);
    }

    #[test]
    fn t_test_rejects_constant_samples() {
        let err = students_t_test(&[2.0, 2.0, 2.0], &[2.0, 2.0]).unwrap_err();
        assert_eq!(err, StatError::ZeroVariance);
    }

    #[test]
    fn mann_whitney_on_disjoint_samples() {
        let outcome = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(outcome.statistic, 0.0);
        assert!((outcome.p_value - 0.0809).abs() < 1e-3);
    }

    #[test]
    fn mann_whitney_all_tied_is_degenerate() {
        let err = mann_whitney_u(&[1.0, 1.0], &[1.0, 1.0]).unwrap_err();
        assert_eq!(err, StatError::ZeroVariance);
    }

    #[test]
    fn wilcoxon_constant_shift() {
        let outcome =
            wilcoxon_signed_rank(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(outcome.statistic, 0.0);
        assert!(outcome.p_value < 0.05);
    }

    #[test]
    fn wilcoxon_identical_samples_fail() {
        let err = wilcoxon_signed_rank(&[1.0, 2.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, StatError::ZeroDifferences);
    }

    #[test]
    fn anova_equal_groups_is_not_significant() {
        let outcome = one_way_anova(&[vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(outcome.statistic.abs() < 1e-12);
        assert!((outcome.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn anova_separated_groups_is_significant() {
        let outcome =
            one_way_anova(&[vec![1.0, 1.1, 0.9], vec![10.0, 10.1, 9.9]]).unwrap();
        assert!(outcome.p_value < 0.001);
    }

    #[test]
    fn anova_zero_within_variance_fails() {
        let err = one_way_anova(&[vec![1.0, 1.0], vec![2.0, 2.0]]).unwrap_err();
        assert_eq!(err, StatError::ZeroVariance);
    }

    #[test]
    fn chi_square_independent_counts() {
        // Perfectly proportional table: statistic 0 after no correction (3x2).
        let outcome = chi_square_independence(&[
            vec![10.0, 20.0],
            vec![20.0, 40.0],
            vec![30.0, 60.0],
        ])
        .unwrap();
        assert!(outcome.statistic.abs() < 1e-9);
        assert!((outcome.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn chi_square_strong_association() {
        let outcome =
            chi_square_independence(&[vec![50.0, 0.0], vec![0.0, 50.0]]).unwrap();
        assert!(outcome.p_value < 1e-6);
    }

    #[test]
    fn fisher_balanced_table_p_is_one() {
        let outcome = fisher_exact([[10, 10], [10, 10]]).unwrap();
        assert_eq!(outcome.statistic, 1.0);
        assert!((outcome.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fisher_skewed_table_is_significant() {
        let outcome = fisher_exact([[12, 0], [0, 12]]).unwrap();
        assert!(outcome.statistic.is_infinite());
        assert!(outcome.p_value < 0.001);
    }
}
