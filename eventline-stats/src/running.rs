//! Incremental Statistics
//!
//! Single-pass count/sum/mean/variance. The update is order dependent and must
//! run as a strict left-to-right fold; there is no merge for partial states.

use serde::{Deserialize, Serialize};

/// Running count, sum, mean and variance
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RunningStats {
    /// Number of values folded in
    pub count: usize,
    /// Sum of values
    pub sum: f64,
    /// Running mean
    pub mean: f64,
    /// Running variance (see [`RunningStats::push`] for the exact recurrence)
    pub vari: f64,
}

impl RunningStats {
    /// The seed state `{0, 0, 0, 0}`
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one value in.
    ///
    /// With `c` the count before the update:
    ///
    /// ```text
    /// k     = 1 / (c + 1)
    /// mean' = mean + k * (x - mean)
    /// ssr'  = (c - 1) * vari + k * c * (x - mean)^2
    /// vari' = ssr' / max(1, c)
    /// ```
    pub fn push(&mut self, x: f64) {
        let count = self.count as f64;
        let k = 1.0 / (count + 1.0);
        let delta = x - self.mean;
        let ssr = (count - 1.0) * self.vari + k * count * delta * delta;

        self.mean += k * delta;
        self.vari = ssr / count.max(1.0);
        self.count += 1;
        self.sum += x;
    }

    /// Standard deviation derived from [`RunningStats::vari`]
    pub fn std_dev(&self) -> f64 {
        self.vari.sqrt()
    }
}

impl Extend<f64> for RunningStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.push(x);
        }
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        stats.extend(iter);
        stats
    }
}

/// Fold `values` left to right into a [`RunningStats`]
pub fn compute_stats(values: &[f64]) -> RunningStats {
    values.iter().copied().collect()
}
