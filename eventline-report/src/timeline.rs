//! Timeline Rows
//!
//! One row per user: a short header (session date, IP, MSISDN) followed by the
//! user's buckets.

use eventline_core::{Bucket, User};
use serde::Serialize;
use serde_json::Value;

/// A user's row in the timeline
#[derive(Debug, Clone, Serialize)]
pub struct UserTimeline {
    /// Session creation time, fractional seconds dropped
    pub date_created: String,
    /// Session IP
    pub ip: String,
    /// Subscriber number from the first event that carries one
    pub msisdn: Option<String>,
    /// Buckets in timeline order
    pub buckets: Vec<Bucket>,
}

impl UserTimeline {
    /// Build the row header from `user` and attach its buckets
    pub fn new(user: &User, buckets: Vec<Bucket>) -> Self {
        let first = user.events.first();

        let date_created = user
            .date_created
            .as_deref()
            .or_else(|| first.map(|e| e.date_created.as_str()))
            .unwrap_or_default();
        let ip = user
            .ip
            .as_deref()
            .or_else(|| first.map(|e| e.ip.as_str()))
            .unwrap_or_default();

        Self {
            date_created: trim_fraction(date_created).to_string(),
            ip: ip.to_string(),
            msisdn: find_msisdn(user),
            buckets,
        }
    }

    /// Events counted across all buckets (boundary events count twice)
    pub fn binned_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// Everything before the first `.`
fn trim_fraction(timestamp: &str) -> &str {
    timestamp.split('.').next().unwrap_or_default()
}

/// `args.msisdn` of the first event where it is set to something non-empty
pub fn find_msisdn(user: &User) -> Option<String> {
    user.events
        .iter()
        .filter_map(|e| e.arg("msisdn"))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Pretty JSON of the events in a bucket, for hover detail
pub fn bucket_detail(bucket: &Bucket) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&bucket.events)
}
