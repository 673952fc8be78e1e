//! Bootstrap confidence intervals for MRR.
//!
//! A single MRR number over a few hundred queries hides how much it would move
//! on a different sample of questions. The percentile bootstrap answers that
//! by resampling per-query reciprocal ranks with replacement.
//!
//! # References
//!
//! - Efron & Tibshirani (1993). "An Introduction to the Bootstrap"
//! - Smucker et al. (2007). "A comparison of statistical significance tests for IR evaluation"

use serde::Serialize;

/// Result of bootstrap confidence interval computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BootstrapResult {
    /// Sample mean
    pub mean: f64,
    /// Lower bound of confidence interval
    pub lower: f64,
    /// Upper bound of confidence interval
    pub upper: f64,
}

impl BootstrapResult {
    /// Formats the result as "mean [lower, upper]".
    pub fn format(&self, precision: usize) -> String {
        format!(
            "{:.prec$} [{:.prec$}, {:.prec$}]",
            self.mean,
            self.lower,
            self.upper,
            prec = precision
        )
    }

    /// Width of the interval.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Computes a bootstrap 95% confidence interval for the mean.
///
/// # Arguments
///
/// * `values` - Per-query reciprocal ranks
/// * `n_bootstrap` - Number of resamples (typically 1000-10000)
/// * `seed` - Random seed for reproducibility
///
/// # Returns
///
/// `None` if `values` is empty or `n_bootstrap` is zero. The bounds are the
/// plain 2.5th and 97.5th percentiles of the resampled means, so with very
/// few resamples they need not bracket `mean`.
///
/// # Example
///
/// ```
/// use docrank_core::evaluation::stats::bootstrap_ci;
///
/// let ranks = vec![1.0, 0.5, 0.0, 1.0, 0.25];
/// let ci = bootstrap_ci(&ranks, 1000, 42).unwrap();
/// assert!(ci.lower <= ci.mean && ci.mean <= ci.upper);
/// ```
pub fn bootstrap_ci(values: &[f64], n_bootstrap: usize, seed: u64) -> Option<BootstrapResult> {
    if values.is_empty() || n_bootstrap == 0 {
        return None;
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;

    let mut rng = LcgRng::new(seed);
    let mut bootstrap_means: Vec<f64> = (0..n_bootstrap)
        .map(|_| {
            let sum: f64 = (0..n).map(|_| values[rng.next_usize(n)]).sum();
            sum / n as f64
        })
        .collect();

    bootstrap_means.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // 2.5th and 97.5th percentiles
    let last = bootstrap_means.len() - 1;
    let lower_idx = ((n_bootstrap as f64) * 0.025) as usize;
    let upper_idx = ((n_bootstrap as f64) * 0.975) as usize;

    Some(BootstrapResult {
        mean,
        lower: bootstrap_means[lower_idx.min(last)],
        upper: bootstrap_means[upper_idx.min(last)],
    })
}

// ============================================================================
// Internal: Simple LCG RNG
// ============================================================================

/// Linear congruential generator with the Numerical Recipes multiplier.
struct LcgRng {
    state: u64,
}

impl LcgRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    fn next_usize(&mut self, max: usize) -> usize {
        // High bits have the longest period
        ((self.next() >> 33) as usize) % max
    }
}
