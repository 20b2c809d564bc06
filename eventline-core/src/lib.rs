#![warn(missing_docs)]
//! Eventline Core - Events, Binning and the Summary Pipeline
//!
//! This crate owns the event model and turns a fetched dataset into:
//! - Per-user event lists sorted by relative time
//! - Statistics over the flattened event times (via `eventline-stats`)
//! - Fixed-width timeline buckets per user
//!
//! It performs no I/O beyond parsing an already-fetched payload.

mod binning;
mod fetch;
mod model;
mod pipeline;

pub use binning::{
    BinningError, Bucket, BucketAlignment, BucketSpec, DEFAULT_BUCKET_WIDTH_MS, MAX_BUCKET_COUNT,
    bin_events, bin_users, classify,
};
pub use fetch::{FetchAction, FetchState};
pub use model::{DatasetError, Event, EventsDataset, User, compare_relative_time};
pub use pipeline::{EventSummary, relative_times, sort_users, summarize};
