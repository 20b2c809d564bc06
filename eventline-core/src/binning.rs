//! Time Binning
//!
//! Partitions a user's events into consecutive fixed-width windows for the
//! timeline view. Windows are inclusive at both ends, so an event sitting on a
//! shared boundary is counted in both neighbours.
//!
//! ```text
//! Zero:    [0, w] [w, 2w] [2w, 3w] ...        count = ceil(max / w)
//! Legacy:  [-w, 0] [0, w] [w, 2w] ...         count = ceil(max / w)
//! ```
//!
//! `Legacy` keeps the layout of the first timeline view, whose first
//! window lies before zero and whose last window stops one width short of the
//! horizon.

use crate::model::{Event, User};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default window width: five seconds
pub const DEFAULT_BUCKET_WIDTH_MS: f64 = 5000.0;

/// Most windows a single timeline may span
pub const MAX_BUCKET_COUNT: usize = 100_000;

/// Errors from binning configuration
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum BinningError {
    /// The bucket width is zero, negative or not finite.
    #[error("Invalid bucket width: {0} (must be a positive number of milliseconds)")]
    InvalidWidth(f64),

    /// The horizon needs more windows than [`MAX_BUCKET_COUNT`].
    #[error("Timeline would need {requested} buckets, limit is {limit}")]
    TooManyBuckets {
        /// `ceil(max_time / width)`
        requested: f64,
        /// The ceiling that was exceeded
        limit: usize,
    },
}

/// Where window `i` starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BucketAlignment {
    /// `[i*w, (i+1)*w]`
    #[default]
    Zero,
    /// `[(i-1)*w, i*w]`
    Legacy,
}

/// Validated binning parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketSpec {
    width_ms: f64,
    alignment: BucketAlignment,
}

impl Default for BucketSpec {
    fn default() -> Self {
        Self {
            width_ms: DEFAULT_BUCKET_WIDTH_MS,
            alignment: BucketAlignment::default(),
        }
    }
}

impl BucketSpec {
    /// Create a spec, rejecting non-positive or non-finite widths
    pub fn new(width_ms: f64, alignment: BucketAlignment) -> Result<Self, BinningError> {
        if !width_ms.is_finite() || width_ms <= 0.0 {
            return Err(BinningError::InvalidWidth(width_ms));
        }
        Ok(Self {
            width_ms,
            alignment,
        })
    }

    /// Window width in milliseconds
    pub fn width_ms(&self) -> f64 {
        self.width_ms
    }

    /// Window alignment
    pub fn alignment(&self) -> BucketAlignment {
        self.alignment
    }

    /// `ceil(max_time / width)`, or zero when `max_time` is not a positive number.
    ///
    /// Fails when the count exceeds [`MAX_BUCKET_COUNT`].
    pub fn bucket_count(&self, max_time: f64) -> Result<usize, BinningError> {
        if !max_time.is_finite() || max_time <= 0.0 {
            return Ok(0);
        }
        let requested = (max_time / self.width_ms).ceil();
        if requested > MAX_BUCKET_COUNT as f64 {
            return Err(BinningError::TooManyBuckets {
                requested,
                limit: MAX_BUCKET_COUNT,
            });
        }
        Ok(requested as usize)
    }

    /// `(from, to)` of window `index`
    pub fn window(&self, index: usize) -> (f64, f64) {
        let i = index as f64;
        match self.alignment {
            BucketAlignment::Zero => (i * self.width_ms, (i + 1.0) * self.width_ms),
            BucketAlignment::Legacy => ((i - 1.0) * self.width_ms, i * self.width_ms),
        }
    }
}

/// One timeline window and the events that fall in it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    /// Position in the timeline
    pub index: usize,
    /// Window start (inclusive)
    pub from: f64,
    /// Window end (inclusive)
    pub to: f64,
    /// Number of matched events
    pub count: usize,
    /// Categories, actions and labels of the matched events, space-joined
    pub classification: String,
    /// Matched events in encounter order
    pub events: Vec<Event>,
}

impl Bucket {
    /// Whether any event matched
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// `"<categories> <actions> <labels>"`, each part joined across `events` in order
pub fn classify(events: &[Event]) -> String {
    let categories: Vec<&str> = events.iter().map(|e| e.category.as_str()).collect();
    let actions: Vec<&str> = events.iter().map(|e| e.action.as_str()).collect();
    let labels: Vec<&str> = events.iter().map(|e| e.label.as_str()).collect();

    format!(
        "{} {} {}",
        categories.join(" "),
        actions.join(" "),
        labels.join(" ")
    )
}

/// Bin `events` into `spec.bucket_count(max_time)` windows.
///
/// Events without a numeric relative time never match.
pub fn bin_events(
    events: &[Event],
    max_time: f64,
    spec: &BucketSpec,
) -> Result<Vec<Bucket>, BinningError> {
    let count = spec.bucket_count(max_time)?;
    Ok(bin_windows(events, count, spec))
}

fn bin_windows(events: &[Event], count: usize, spec: &BucketSpec) -> Vec<Bucket> {
    (0..count)
        .map(|index| {
            let (from, to) = spec.window(index);
            let matched: Vec<Event> = events
                .iter()
                .filter(|e| {
                    e.relative_millis()
                        .is_some_and(|t| t >= from && t <= to)
                })
                .cloned()
                .collect();

            Bucket {
                index,
                from,
                to,
                count: matched.len(),
                classification: classify(&matched),
                events: matched,
            }
        })
        .collect()
}

/// Bin every user independently, in parallel. Rows keep the input order.
pub fn bin_users(
    users: &[User],
    max_time: f64,
    spec: &BucketSpec,
) -> Result<Vec<Vec<Bucket>>, BinningError> {
    let count = spec.bucket_count(max_time)?;
    Ok(users
        .par_iter()
        .map(|user| bin_windows(&user.events, count, spec))
        .collect())
}
