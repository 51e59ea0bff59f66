//! Summary statistics for comparing independent runs.
//!
//! Confidence intervals use the two-sided 95% Student-t critical value with
//! `n - 1` degrees of freedom: `mean ± t* · std / √n`.

use crate::schema::{GenerationStats, SummaryStats};

/// Two-sided 95% critical values (0.975 quantile) for df = 1..=30.
const T_975: [f64; 30] = [
    12.706_204_736,
    4.302_652_730,
    3.182_446_305,
    2.776_445_105,
    2.570_581_836,
    2.446_911_851,
    2.364_624_252,
    2.306_004_135,
    2.262_157_163,
    2.228_138_852,
    2.200_985_160,
    2.178_812_830,
    2.160_368_656,
    2.144_786_688,
    2.131_449_546,
    2.119_905_299,
    2.109_815_578,
    2.100_922_040,
    2.093_024_054,
    2.085_963_447,
    2.079_613_845,
    2.073_873_068,
    2.068_657_610,
    2.063_898_562,
    2.059_538_553,
    2.055_529_439,
    2.051_830_516,
    2.048_407_142,
    2.045_229_642,
    2.042_272_456,
];

/// 0.975 quantile of the standard normal distribution.
const Z_975: f64 = 1.959_963_984_540_054;

/// Arithmetic mean. Empty input yields NaN.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Bessel-corrected sample standard deviation (divisor `n - 1`).
///
/// Returns 0 for fewer than two samples.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Two-sided 95% Student-t critical value for `df` degrees of freedom.
///
/// Exact table values up to 30 degrees of freedom, Cornish-Fisher expansion
/// around the normal quantile above that. `df == 0` yields infinity.
pub fn t_critical_95(df: usize) -> f64 {
    match df {
        0 => f64::INFINITY,
        1..=30 => T_975[df - 1],
        _ => {
            let z = Z_975;
            let n = df as f64;
            let z3 = z.powi(3);
            let z5 = z.powi(5);
            let z7 = z.powi(7);
            let z9 = z.powi(9);
            z + (z3 + z) / (4.0 * n)
                + (5.0 * z5 + 16.0 * z3 + 3.0 * z) / (96.0 * n.powi(2))
                + (3.0 * z7 + 19.0 * z5 + 17.0 * z3 - 15.0 * z) / (384.0 * n.powi(3))
                + (79.0 * z9 + 776.0 * z7 + 1482.0 * z5 - 1920.0 * z3 - 945.0 * z)
                    / (92160.0 * n.powi(4))
        }
    }
}

impl SummaryStats {
    /// Mean, sample std and Student-t 95% interval of `samples`.
    ///
    /// A single sample gives a degenerate interval at the mean.
    pub fn from_samples(samples: &[f64]) -> Self {
        let mean = mean(samples);
        let std = sample_std(samples);
        let half_width = if samples.len() < 2 {
            0.0
        } else {
            t_critical_95(samples.len() - 1) * std / (samples.len() as f64).sqrt()
        };

        Self {
            mean,
            std,
            ci_low: mean - half_width,
            ci_high: mean + half_width,
        }
    }

    pub fn half_width(&self) -> f64 {
        (self.ci_high - self.ci_low) / 2.0
    }
}

/// Error for per-generation statistics over series of unequal length.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Series {index} has {found} generations, expected {expected}")]
pub struct LengthMismatch {
    pub index: usize,
    pub expected: usize,
    pub found: usize,
}

impl GenerationStats {
    /// Column-wise mean and 95% interval over equally long series.
    pub fn from_series(series: &[Vec<f64>]) -> Result<Self, LengthMismatch> {
        let Some(first) = series.first() else {
            return Ok(Self::default());
        };
        let expected = first.len();

        if let Some((index, s)) = series.iter().enumerate().find(|(_, s)| s.len() != expected) {
            return Err(LengthMismatch {
                index,
                expected,
                found: s.len(),
            });
        }

        let mut stats = Self {
            mean: Vec::with_capacity(expected),
            ci_low: Vec::with_capacity(expected),
            ci_high: Vec::with_capacity(expected),
        };
        let mut column = Vec::with_capacity(series.len());

        for generation in 0..expected {
            column.clear();
            column.extend(series.iter().map(|s| s[generation]));

            let summary = SummaryStats::from_samples(&column);
            stats.mean.push(summary.mean);
            stats.ci_low.push(summary.ci_low);
            stats.ci_high.push(summary.ci_high);
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-12);
        // Sum of squared deviations is 32, divisor n - 1 = 7
        assert!((sample_std(&values) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_t_critical_values() {
        assert!((t_critical_95(9) - 2.262).abs() < 1e-3);
        assert!((t_critical_95(24) - 2.064).abs() < 1e-3);
        // Beyond the table the expansion should stay close to known quantiles
        assert!((t_critical_95(40) - 2.021_075).abs() < 1e-4);
        assert!((t_critical_95(120) - 1.979_930).abs() < 1e-4);
        assert!(t_critical_95(100_000) > Z_975);
        assert!(t_critical_95(100_000) - Z_975 < 1e-4);
    }

    #[test]
    fn test_t_critical_decreasing() {
        for df in 1..200 {
            assert!(t_critical_95(df) > t_critical_95(df + 1), "df = {df}");
        }
    }

    #[test]
    fn test_summary_interval() {
        let samples = [1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = SummaryStats::from_samples(&samples);
        let expected_half = 2.776_445_105 * stats.std / 5.0f64.sqrt();

        assert!((stats.mean - 3.0).abs() < 1e-12);
        assert!((stats.half_width() - expected_half).abs() < 1e-9);
        assert!(stats.ci_low < stats.mean && stats.mean < stats.ci_high);
    }

    #[test]
    fn test_generation_stats_columns() {
        let series = vec![vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 5.0]];
        let stats = GenerationStats::from_series(&series).unwrap();

        assert_eq!(stats.mean, vec![2.0, 2.0, 4.0]);
        assert_eq!(stats.ci_low[1], 2.0);
        assert_eq!(stats.ci_high[1], 2.0);
        assert!(stats.ci_low[0] < 2.0);
    }

    #[test]
    fn test_generation_stats_mismatch() {
        let series = vec![vec![1.0, 2.0], vec![1.0, 2.0], vec![1.0]];
        assert_eq!(
            GenerationStats::from_series(&series),
            Err(LengthMismatch {
                index: 2,
                expected: 2,
                found: 1
            })
        );
    }
}
