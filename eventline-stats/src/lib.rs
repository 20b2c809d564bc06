#![warn(missing_docs)]
//! Eventline Statistical Engine
//!
//! Numeric analysis over event-time series:
//! - Outlier filtering via a generous IQR rule
//! - Incremental count/sum/mean/variance in a single left-to-right pass
//! - Summary combining cleaned central tendency with raw extremes

mod outliers;
mod running;
mod summary;

pub use outliers::{
    DEFAULT_IQR_MULTIPLIER, OutlierAnalysis, OutlierMethod, QuartileIndex, detect_outliers,
    filter_outliers, quartiles, sorted_copy,
};
pub use running::{RunningStats, compute_stats};
pub use summary::{
    StatsResult, SummaryStatistics, compute_summary, max_of, median, min_of,
};
