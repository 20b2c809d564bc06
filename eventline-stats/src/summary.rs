//! Summary Statistics
//!
//! Combines the outlier filter and the running fold:
//! - count, sum, mean, vari and median come from the CLEANED samples
//! - min and max come from ALL samples (outliers preserved)
//!
//! An empty series is not an error. Extremes fall back to `-inf`/`+inf` and
//! the median to `NaN`; serde_json writes all three as `null`.

use crate::outliers::{OutlierAnalysis, OutlierMethod, detect_outliers};
use crate::running::{RunningStats, compute_stats};
use serde::Serialize;

/// Statistics over an event-time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsResult {
    /// Number of cleaned samples
    pub count: usize,
    /// Sum of cleaned samples
    pub sum: f64,
    /// Mean of cleaned samples
    pub mean: f64,
    /// Running variance of cleaned samples
    pub vari: f64,
    /// Maximum over ALL samples, `-inf` when empty
    pub max: f64,
    /// Median of cleaned samples, `NaN` when empty
    pub median: f64,
    /// Minimum over ALL samples, `+inf` when empty
    pub min: f64,
}

impl StatsResult {
    /// Merge the running fold with the separately computed extremes and median
    pub fn from_parts(running: RunningStats, max: f64, median: f64, min: f64) -> Self {
        Self {
            count: running.count,
            sum: running.sum,
            mean: running.mean,
            vari: running.vari,
            max,
            median,
            min,
        }
    }

    /// Span between the raw extremes, `0` for an empty series
    pub fn range(&self) -> f64 {
        if self.max.is_finite() && self.min.is_finite() {
            self.max - self.min
        } else {
            0.0
        }
    }
}

/// Summary plus the outlier analysis it was derived from
#[derive(Debug, Clone)]
pub struct SummaryStatistics {
    /// Combined statistics
    pub stats: StatsResult,
    /// Outlier analysis of the raw samples
    pub outlier_analysis: OutlierAnalysis,
}

/// Largest value, seeded with `-inf`
pub fn max_of(samples: &[f64]) -> f64 {
    samples.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Smallest value, seeded with `+inf`
pub fn min_of(samples: &[f64]) -> f64 {
    samples.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Median of `samples`; the mean of the two middle values for even lengths.
///
/// Returns `NaN` for an empty slice.
pub fn median(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    if n % 2 == 0 {
        let mid = n / 2;
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Compute summary statistics with proper separation of cleaned vs raw data
pub fn compute_summary(samples: &[f64], outlier_method: OutlierMethod) -> SummaryStatistics {
    let analysis = detect_outliers(samples, outlier_method);
    let cleaned = &analysis.cleaned_samples;

    // Central tendency from CLEANED data
    let running = compute_stats(cleaned);
    let median = median(cleaned);

    // Extremes from ALL data
    let max = max_of(samples);
    let min = min_of(samples);

    SummaryStatistics {
        stats: StatsResult::from_parts(running, max, median, min),
        outlier_analysis: analysis,
    }
}
