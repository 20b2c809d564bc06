//! Report Data Structures

use crate::engagement::EngagementSummary;
use crate::timeline::UserTimeline;
use chrono::{DateTime, Utc};
use eventline_core::{BinningError, BucketAlignment, BucketSpec, EventSummary};
use eventline_stats::{OutlierMethod, StatsResult};
use serde::Serialize;

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete eventline report
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub stats: StatsResult,
    pub engagement: Option<EngagementSummary>,
    pub timeline: Vec<UserTimeline>,
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    /// Where the dataset was read from
    pub source: Option<String>,
    pub config: ReportConfig,
}

/// Analysis settings captured in report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportConfig {
    pub bucket_width_ms: f64,
    pub alignment: BucketAlignment,
    pub outlier_method: OutlierMethod,
}

/// Dataset-level counts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub users: usize,
    pub events: usize,
    pub timed_events: usize,
    pub untimed_events: usize,
    pub outliers_removed: usize,
    pub low_outliers: usize,
    pub high_outliers: usize,
    pub buckets_per_user: usize,
}

/// Assemble a report from a pipeline result.
///
/// Every user gets the same number of buckets, sized by the raw maximum event
/// time. The outlier method recorded in the metadata is the one the summary
/// was computed with.
pub fn build_report(
    summary: &EventSummary,
    spec: &BucketSpec,
    engagement: Option<EngagementSummary>,
    source: Option<String>,
) -> Result<Report, BinningError> {
    let buckets_per_user = spec.bucket_count(summary.stats.max)?;
    let rows = summary.timeline(spec)?;
    let timeline: Vec<UserTimeline> = summary
        .users
        .iter()
        .zip(rows)
        .map(|(user, buckets)| UserTimeline::new(user, buckets))
        .collect();

    let analysis = &summary.outliers;
    let report_summary = ReportSummary {
        users: summary.users.len(),
        events: summary.timed_event_count() + summary.untimed_event_count(),
        timed_events: summary.timed_event_count(),
        untimed_events: summary.untimed_event_count(),
        outliers_removed: analysis.outlier_count(),
        low_outliers: analysis.low_outlier_count,
        high_outliers: analysis.high_outlier_count,
        buckets_per_user,
    };

    Ok(Report {
        meta: ReportMeta {
            schema_version: SCHEMA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            source,
            config: ReportConfig {
                bucket_width_ms: spec.width_ms(),
                alignment: spec.alignment(),
                outlier_method: analysis.method,
            },
        },
        stats: summary.stats,
        engagement,
        timeline,
        summary: report_summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventline_core::{Event, EventsDataset, User, summarize};

    fn dataset() -> EventsDataset {
        EventsDataset::new(vec![
            User::new(vec![
                Event::new("page", "view", "home").at(9000.0),
                Event::new("page", "view", "home").at(100.0),
                Event::new("page", "load", "home"),
            ]),
            User::new(vec![Event::new("click", "tap", "cta").at(5000.0)]),
        ])
    }

    #[test]
    fn test_build_report() {
        let method = OutlierMethod::default();
        let summary = summarize(dataset(), method);
        let report = build_report(&summary, &BucketSpec::default(), None, None).unwrap();

        assert_eq!(report.summary.users, 2);
        assert_eq!(report.summary.events, 4);
        assert_eq!(report.summary.timed_events, 3);
        assert_eq!(report.summary.untimed_events, 1);
        assert_eq!(report.summary.outliers_removed, 0);
        assert_eq!(report.summary.buckets_per_user, 2);

        assert_eq!(report.timeline.len(), 2);
        assert!(report.timeline.iter().all(|row| row.buckets.len() == 2));
        // 5000 sits on the shared boundary
        assert_eq!(report.timeline[1].binned_count(), 2);
        assert_eq!(report.stats.max, 9000.0);
    }

    #[test]
    fn test_report_meta() {
        let method = OutlierMethod::None;
        let summary = summarize(dataset(), method);
        let report = build_report(
            &summary,
            &BucketSpec::default(),
            None,
            Some("events.json".into()),
        )
        .unwrap();

        assert_eq!(report.meta.schema_version, SCHEMA_VERSION);
        assert_eq!(report.meta.source.as_deref(), Some("events.json"));
        assert_eq!(report.meta.config.bucket_width_ms, 5000.0);
        assert_eq!(report.meta.config.alignment, BucketAlignment::Zero);
        assert_eq!(report.meta.config.outlier_method, OutlierMethod::None);
    }

    #[test]
    fn test_empty_report() {
        let method = OutlierMethod::default();
        let summary = summarize(EventsDataset::default(), method);
        let report = build_report(&summary, &BucketSpec::default(), None, None).unwrap();

        assert_eq!(report.summary, ReportSummary::default());
        assert!(report.timeline.is_empty());
    }

    #[test]
    fn test_stray_time_fails_report() {
        let dataset = EventsDataset::new(vec![User::new(vec![
            Event::new("page", "view", "home").at(100.0),
            Event::new("page", "view", "home").at(1.6e12),
        ])]);
        let summary = summarize(dataset, OutlierMethod::default());

        let err = build_report(&summary, &BucketSpec::default(), None, None).unwrap_err();
        assert!(matches!(err, BinningError::TooManyBuckets { .. }));
    }
}
