#![warn(missing_docs)]
//! # Eventline
//!
//! Event-time analysis for user-interaction datasets.
//!
//! Eventline takes an already-fetched list of users and their events and produces:
//! - **Sorted Sessions**: each user's events ordered by relative time, untimed events last
//! - **Robust Statistics**: count, sum, mean and variance over IQR-filtered times, with
//!   max and min taken from the raw series
//! - **Timelines**: fixed-width, inclusive time buckets per user with a short
//!   category/action/label classification
//! - **Reports**: human-readable, JSON and CSV output with an optional engagement headline
//!
//! ## Quick Start
//!
//! ```ignore
//! use eventline::prelude::*;
//!
//! let dataset = EventsDataset::load("events.json")?;
//! let summary = summarize(dataset, OutlierMethod::default());
//!
//! println!("mean: {} ms, max: {} ms", summary.stats.mean, summary.stats.max);
//! for buckets in summary.timeline(&BucketSpec::default())? {
//!     let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
//!     println!("{:?}", counts);
//! }
//! ```
//!
//! ## Statistics Only
//!
//! ```ignore
//! let stats = eventline::compute_stats(&[2.0, 4.0, 4.0, 5.0]);
//! let cleaned = eventline::filter_outliers(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 100.0]);
//! ```

// Re-export the event model and pipeline
pub use eventline_core::{
    BinningError, Bucket, BucketAlignment, BucketSpec, DEFAULT_BUCKET_WIDTH_MS, DatasetError,
    Event, EventSummary, EventsDataset, FetchAction, FetchState, MAX_BUCKET_COUNT, User,
    bin_events, bin_users, classify, compare_relative_time, relative_times, sort_users,
    summarize,
};

// Re-export stats
pub use eventline_stats::{
    DEFAULT_IQR_MULTIPLIER, OutlierAnalysis, OutlierMethod, QuartileIndex, RunningStats,
    StatsResult, SummaryStatistics, compute_stats, compute_summary, detect_outliers,
    filter_outliers, max_of, median, min_of,
};

// Re-export reporting
pub use eventline_report::{
    EngagementError, EngagementSummary, OutputFormat, Report, UserTimeline, bucket_detail,
    build_report, find_msisdn, format_date, generate_csv_report, generate_json_report, generate_summary_json,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BucketAlignment, BucketSpec, Event, EventSummary, EventsDataset, OutlierMethod,
        QuartileIndex, StatsResult, User, summarize,
    };
}

/// Run the Eventline CLI.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     eventline::run()
/// }
/// ```
pub use eventline_cli::run;
