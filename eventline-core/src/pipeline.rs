//! Event Summary Pipeline
//!
//! ```text
//! EventsDataset
//!       │  sort each user's events by relative time
//!       ▼
//! flatten ──► numeric relative times (raw)
//!                   │                    │
//!                   ▼                    │
//!             outlier filter             │
//!                   │                    │
//!                   ▼                    ▼
//!      count/sum/mean/vari, median    max, min
//! ```
//!
//! The steps run strictly in this order. The raw maximum also sizes the
//! timeline horizon.

use crate::binning::{BinningError, Bucket, BucketSpec, bin_users};
use crate::model::{EventsDataset, User};
use eventline_stats::{OutlierAnalysis, OutlierMethod, StatsResult, compute_summary};
use serde::Serialize;
use tracing::debug;

/// Sorted users plus statistics over their event times
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    /// Users with events sorted by relative time
    pub users: Vec<User>,
    /// Statistics over the flattened event times
    #[serde(flatten)]
    pub stats: StatsResult,
    /// Outlier analysis behind `stats`
    #[serde(skip)]
    pub outliers: OutlierAnalysis,
}

impl EventSummary {
    /// Bin every user's events up to the raw maximum event time.
    ///
    /// Fails when a stray maximum would need more than
    /// [`MAX_BUCKET_COUNT`](crate::MAX_BUCKET_COUNT) buckets.
    pub fn timeline(&self, spec: &BucketSpec) -> Result<Vec<Vec<Bucket>>, BinningError> {
        bin_users(&self.users, self.stats.max, spec)
    }

    /// Events with a numeric relative time
    pub fn timed_event_count(&self) -> usize {
        self.outliers.sorted_samples.len()
    }

    /// Events without a numeric relative time
    pub fn untimed_event_count(&self) -> usize {
        let total: usize = self.users.iter().map(|u| u.events.len()).sum();
        total - self.timed_event_count()
    }
}

/// Sort every user's events in place
pub fn sort_users(users: &mut [User]) {
    for user in users.iter_mut() {
        user.sort_events();
    }
}

/// Flatten all users' numeric relative times, in user then event order
pub fn relative_times(users: &[User]) -> Vec<f64> {
    users.iter().flat_map(|u| u.relative_times()).collect()
}

/// Run the full pipeline over a dataset
pub fn summarize(dataset: EventsDataset, method: OutlierMethod) -> EventSummary {
    let mut users = dataset.users;
    sort_users(&mut users);

    let times = relative_times(&users);
    let summary = compute_summary(&times, method);

    debug!(
        users = users.len(),
        timed_events = times.len(),
        outliers = summary.outlier_analysis.outlier_count(),
        "summarized event times"
    );

    EventSummary {
        users,
        stats: summary.stats,
        outliers: summary.outlier_analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::BucketAlignment;
    use crate::model::Event;

    fn ev(t: f64) -> Event {
        Event::new("c", "a", "l").at(t)
    }

    #[test]
    fn test_scenario_two_events() {
        let dataset = EventsDataset::new(vec![User::new(vec![ev(100.0), ev(50.0)])]);
        let summary = summarize(dataset, OutlierMethod::default());

        let times: Vec<_> = summary.users[0].relative_times().collect();
        assert_eq!(times, vec![50.0, 100.0]);

        assert_eq!(summary.outliers.cleaned_samples, vec![50.0, 100.0]);
        assert_eq!(summary.stats.count, 2);
        assert_eq!(summary.stats.sum, 150.0);
        assert_eq!(summary.stats.mean, 75.0);
        assert_eq!(summary.stats.vari, 1250.0);
        assert_eq!(summary.stats.max, 100.0);
        assert_eq!(summary.stats.min, 50.0);
        assert_eq!(summary.stats.median, 75.0);
    }

    #[test]
    fn test_extremes_from_raw_series_median_from_filtered() {
        let dataset = EventsDataset::new(vec![
            User::new(vec![ev(7.0), ev(1.0), ev(100_000.0), ev(4.0)]),
            User::new(vec![ev(2.0), ev(3.0), ev(6.0), ev(5.0)]),
        ]);
        let summary = summarize(dataset, OutlierMethod::default());

        assert_eq!(summary.stats.max, 100_000.0);
        assert_eq!(summary.stats.min, 1.0);
        assert_eq!(summary.stats.median, 4.0);
        assert_eq!(summary.stats.count, 7);
        assert_eq!(summary.outliers.outlier_count(), 1);
    }

    #[test]
    fn test_flatten_order_is_users_then_sorted_events() {
        let mut users = vec![
            User::new(vec![ev(30.0), ev(10.0)]),
            User::new(vec![ev(5.0)]),
        ];
        sort_users(&mut users);
        assert_eq!(relative_times(&users), vec![10.0, 30.0, 5.0]);
    }

    #[test]
    fn test_untimed_events_are_kept_but_not_counted() {
        let dataset = EventsDataset::new(vec![User::new(vec![
            Event::new("c", "a", "untimed"),
            ev(10.0),
        ])]);
        let summary = summarize(dataset, OutlierMethod::default());

        assert_eq!(summary.users[0].events.len(), 2);
        assert_eq!(summary.users[0].events[1].label, "untimed");
        assert_eq!(summary.stats.count, 1);
        assert_eq!(summary.timed_event_count(), 1);
        assert_eq!(summary.untimed_event_count(), 1);
    }

    #[test]
    fn test_empty_dataset_degrades_to_sentinels() {
        let summary = summarize(EventsDataset::default(), OutlierMethod::default());

        assert!(summary.users.is_empty());
        assert_eq!(summary.stats.count, 0);
        assert_eq!(summary.stats.sum, 0.0);
        assert_eq!(summary.stats.max, f64::NEG_INFINITY);
        assert_eq!(summary.stats.min, f64::INFINITY);
        assert!(summary.stats.median.is_nan());
        assert!(summary.timeline(&BucketSpec::default()).unwrap().is_empty());
    }

    #[test]
    fn test_users_without_events() {
        let dataset = EventsDataset::new(vec![User::default(), User::default()]);
        let summary = summarize(dataset, OutlierMethod::default());

        let rows = summary.timeline(&BucketSpec::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_timeline_horizon_uses_raw_max() {
        let dataset = EventsDataset::new(vec![User::new(vec![
            ev(1000.0),
            ev(2000.0),
            ev(3000.0),
            ev(4000.0),
            ev(5000.0),
            ev(6000.0),
            ev(7000.0),
            ev(60_000.0),
        ])]);
        let summary = summarize(dataset, OutlierMethod::default());
        assert_eq!(summary.stats.count, 7);

        let rows = summary.timeline(&BucketSpec::default()).unwrap();
        assert_eq!(rows[0].len(), 12);
        assert_eq!(rows[0].last().map(|b| b.count), Some(1));

        let legacy = BucketSpec::new(5000.0, BucketAlignment::Legacy).unwrap();
        let rows = summary.timeline(&legacy).unwrap();
        assert_eq!(rows[0].len(), 12);
        assert_eq!(rows[0].last().map(|b| b.count), Some(0));
    }

    #[test]
    fn test_stray_time_fails_timeline_but_not_stats() {
        let dataset = EventsDataset::new(vec![User::new(vec![ev(100.0), ev(1e300)])]);
        let summary = summarize(dataset, OutlierMethod::default());

        assert_eq!(summary.stats.max, 1e300);
        assert!(matches!(
            summary.timeline(&BucketSpec::default()),
            Err(BinningError::TooManyBuckets { .. })
        ));
    }

    #[test]
    fn test_serialized_shape() {
        let dataset = EventsDataset::new(vec![User::new(vec![ev(100.0), ev(50.0)])]);
        let summary = summarize(dataset, OutlierMethod::default());
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["count"], 2);
        assert_eq!(json["max"], 100.0);
        assert_eq!(json["users"][0]["events"][0]["relt"], 50.0);
        assert!(json.get("outliers").is_none());
    }
}
