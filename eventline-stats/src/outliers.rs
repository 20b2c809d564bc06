//! Outlier Filtering
//!
//! Uses a generous IQR (Interquartile Range) rule to drop extreme event times.
//!
//! The quartiles are read directly at `floor(n/4)` and `ceil(3n/4)` of the
//! sorted samples, without interpolation. The upper index reaches `n` for
//! `n <= 3`; [`QuartileIndex`] decides what happens then.
//!
//! Only the central-tendency statistics use the cleaned samples. Extremes are
//! taken from the raw series by the caller.

use serde::{Deserialize, Serialize};

/// Default IQR multiplier (`q1 - 1.5*iqr ..= q3 + 1.5*iqr`)
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Policy for a quartile index that falls past the end of the samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QuartileIndex {
    /// Clamp the index to the last sample
    #[default]
    Clamp,
    /// Treat the quartile as absent, which rejects every sample
    Strict,
}

/// Method for outlier filtering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OutlierMethod {
    /// Keep samples inside `[q1 - multiplier*iqr, q3 + multiplier*iqr]`
    Iqr {
        /// IQR multiplier
        multiplier: f64,
        /// Out-of-range quartile index policy
        quartiles: QuartileIndex,
    },
    /// No filtering
    None,
}

impl Default for OutlierMethod {
    fn default() -> Self {
        OutlierMethod::Iqr {
            multiplier: DEFAULT_IQR_MULTIPLIER,
            quartiles: QuartileIndex::Clamp,
        }
    }
}

/// Result of outlier analysis
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierAnalysis {
    /// All samples, sorted ascending
    pub sorted_samples: Vec<f64>,
    /// Samples inside the bounds, sorted ascending
    pub cleaned_samples: Vec<f64>,
    /// Number of samples below the lower bound
    pub low_outlier_count: usize,
    /// Number of samples above the upper bound
    pub high_outlier_count: usize,
    /// Lower bound, `None` when a quartile was absent
    pub lower_bound: Option<f64>,
    /// Upper bound, `None` when a quartile was absent
    pub upper_bound: Option<f64>,
    /// Method used
    pub method: OutlierMethod,
}

impl OutlierAnalysis {
    /// Number of samples that did not survive filtering
    pub fn outlier_count(&self) -> usize {
        self.sorted_samples.len() - self.cleaned_samples.len()
    }

    /// Percentage of samples that are outliers
    pub fn outlier_percentage(&self) -> f64 {
        if self.sorted_samples.is_empty() {
            return 0.0;
        }
        (self.outlier_count() as f64 / self.sorted_samples.len() as f64) * 100.0
    }
}

/// Sort a copy of `samples` ascending
pub fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Read the `(q1, q3)` pair from sorted samples.
///
/// Returns `None` for an empty slice, and under [`QuartileIndex::Strict`] when
/// the upper index is `n`.
pub fn quartiles(sorted: &[f64], policy: QuartileIndex) -> Option<(f64, f64)> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }

    let q1_idx = n / 4;
    // ceil(3n/4) without going through floats
    let q3_idx = (3 * n).div_ceil(4);

    let q3_idx = match policy {
        QuartileIndex::Clamp => q3_idx.min(n - 1),
        QuartileIndex::Strict if q3_idx >= n => return None,
        QuartileIndex::Strict => q3_idx,
    };

    Some((sorted[q1_idx], sorted[q3_idx]))
}

/// Filter outliers with the default generous IQR rule.
///
/// The input is left untouched; the result is sorted ascending.
///
/// # Examples
///
/// ```
/// # use eventline_stats::filter_outliers;
/// let kept = filter_outliers(&[7.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 100.0]);
/// assert_eq!(kept, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
/// ```
pub fn filter_outliers(samples: &[f64]) -> Vec<f64> {
    detect_outliers(samples, OutlierMethod::default()).cleaned_samples
}

/// Analyse samples with the given method
pub fn detect_outliers(samples: &[f64], method: OutlierMethod) -> OutlierAnalysis {
    let sorted = sorted_copy(samples);

    match method {
        OutlierMethod::None => OutlierAnalysis {
            cleaned_samples: sorted.clone(),
            sorted_samples: sorted,
            low_outlier_count: 0,
            high_outlier_count: 0,
            lower_bound: None,
            upper_bound: None,
            method,
        },
        OutlierMethod::Iqr {
            multiplier,
            quartiles: policy,
        } => detect_iqr_outliers(sorted, multiplier, policy, method),
    }
}

fn detect_iqr_outliers(
    sorted: Vec<f64>,
    multiplier: f64,
    policy: QuartileIndex,
    method: OutlierMethod,
) -> OutlierAnalysis {
    let Some((q1, q3)) = quartiles(&sorted, policy) else {
        // No bounds: nothing can be shown to be inside them
        return OutlierAnalysis {
            cleaned_samples: Vec::new(),
            low_outlier_count: 0,
            high_outlier_count: 0,
            lower_bound: None,
            upper_bound: None,
            method,
            sorted_samples: sorted,
        };
    };

    let iqr = q3 - q1;
    let upper_bound = q3 + iqr * multiplier;
    let lower_bound = q1 - iqr * multiplier;

    let mut low_count = 0;
    let mut high_count = 0;
    let mut cleaned = Vec::with_capacity(sorted.len());

    for &sample in &sorted {
        if sample < lower_bound {
            low_count += 1;
        } else if sample > upper_bound {
            high_count += 1;
        } else if sample >= lower_bound && sample <= upper_bound {
            cleaned.push(sample);
        }
    }

    OutlierAnalysis {
        sorted_samples: sorted,
        cleaned_samples: cleaned,
        low_outlier_count: low_count,
        high_outlier_count: high_count,
        lower_bound: Some(lower_bound),
        upper_bound: Some(upper_bound),
        method,
    }
}
