//! Engagement Summary
//!
//! Headline numbers shown above the timeline: total views, engagement rate and
//! the queried date range.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing an engagement summary
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngagementError {
    /// Not valid JSON, or a required field is missing.
    #[error("Malformed engagement summary: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The payload was an empty array.
    #[error("Engagement summary is empty")]
    Empty,
}

/// Aggregate view counts for the queried period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementSummary {
    /// Start of the period
    #[serde(default)]
    pub from_date: Option<String>,
    /// End of the period
    #[serde(default)]
    pub to_date: Option<String>,
    /// Views with at least one interaction
    pub with_engagement: u64,
    /// All views
    pub total: u64,
}

impl EngagementSummary {
    /// Parse an object, or the first element of an array of them
    pub fn from_json_str(json: &str) -> Result<Self, EngagementError> {
        if json.trim_start().starts_with('[') {
            let rows: Vec<Self> = serde_json::from_str(json)?;
            rows.into_iter().next().ok_or(EngagementError::Empty)
        } else {
            Ok(serde_json::from_str(json)?)
        }
    }

    /// Engaged views as a rounded percentage; `None` when there were no views
    pub fn engagement_rate(&self) -> Option<u64> {
        if self.total == 0 {
            return None;
        }
        Some(((100.0 * self.with_engagement as f64) / self.total as f64).round() as u64)
    }

    /// `(from, to)` rendered with [`format_date`]
    pub fn date_range(&self) -> (String, String) {
        (
            format_date(self.from_date.as_deref().unwrap_or_default()),
            format_date(self.to_date.as_deref().unwrap_or_default()),
        )
    }
}

/// Render an ISO-like timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
///
/// Empty or unrecognised input renders as an empty string. Timestamps without
/// an offset are taken as UTC.
pub fn format_date(input: &str) -> String {
    const OUT: &str = "%Y-%m-%d %H:%M:%S";

    let input = input.trim();
    if input.is_empty() {
        return String::new();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return dt.with_timezone(&Utc).format(OUT).to_string();
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, pattern) {
            return naive.format(OUT).to_string();
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.format(OUT).to_string())
        .unwrap_or_default()
}
