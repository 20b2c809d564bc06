//! Output Formatting
//!
//! Human-readable output for eventline reports:
//! - Engagement headline (views, engagement rate, date range)
//! - Event-time statistics
//! - Per-user timeline with one cell per bucket

use eventline_core::BucketAlignment;
use eventline_report::{Report, UserTimeline};

/// Width of one timeline cell
const CELL_WIDTH: usize = 3;

/// Format a number of milliseconds, or `-` when not finite
fn fmt_ms(value: f64) -> String {
    if value.is_finite() {
        format!("{:.1} ms", value)
    } else {
        "-".to_string()
    }
}

/// One cell per bucket: the event count, or a dot when empty
fn timeline_cells(row: &UserTimeline) -> String {
    row.buckets
        .iter()
        .map(|b| {
            if b.count > 0 {
                format!("{:>width$}", b.count, width = CELL_WIDTH)
            } else {
                format!("{:>width$}", "·", width = CELL_WIDTH)
            }
        })
        .collect()
}

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Eventline Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    if let Some(engagement) = &report.engagement {
        output.push_str(&format!("  Total Views: {}\n", engagement.total));
        match engagement.engagement_rate() {
            Some(rate) => output.push_str(&format!("  Engagement Rate: {}%\n", rate)),
            None => output.push_str("  Engagement Rate: -\n"),
        }
        let (from, to) = engagement.date_range();
        output.push_str(&format!("  {} {}\n\n", from, to));
    }

    let stats = &report.stats;
    let summary = &report.summary;
    output.push_str("Event Times\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  users: {}  events: {}  timed: {}  untimed: {}\n",
        summary.users, summary.events, summary.timed_events, summary.untimed_events
    ));
    output.push_str(&format!(
        "  count: {}  outliers removed: {} ({} low, {} high)\n",
        stats.count, summary.outliers_removed, summary.low_outliers, summary.high_outliers
    ));
    output.push_str(&format!(
        "  mean: {}  median: {}  stddev: {}\n",
        fmt_ms(stats.mean),
        fmt_ms(stats.median),
        fmt_ms(stats.vari.sqrt())
    ));
    output.push_str(&format!(
        "  min: {}  max: {}  sum: {}\n",
        fmt_ms(stats.min),
        fmt_ms(stats.max),
        fmt_ms(stats.sum)
    ));
    output.push('\n');

    let config = &report.meta.config;
    let alignment = match config.alignment {
        BucketAlignment::Zero => "zero-aligned",
        BucketAlignment::Legacy => "legacy-aligned",
    };
    output.push_str(&format!(
        "Timeline ({} buckets of {} ms, {})\n",
        summary.buckets_per_user, config.bucket_width_ms, alignment
    ));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    if report.timeline.is_empty() {
        output.push_str("  No users.\n");
    }

    for row in &report.timeline {
        output.push_str(&format!(
            "  {:<19}  {:<15}  {:<13} |{}|\n",
            row.date_created,
            row.ip,
            row.msisdn.as_deref().unwrap_or_default(),
            timeline_cells(row)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventline_core::{BucketSpec, Event, EventsDataset, User, summarize};
    use eventline_report::{EngagementSummary, build_report};
    use eventline_stats::OutlierMethod;

    fn report(engagement: Option<EngagementSummary>) -> Report {
        let mut user = User::new(vec![
            Event::new("page", "view", "home").at(1200.0),
            Event::new("click", "tap", "cta")
                .at(11_000.0)
                .with_arg("msisdn", "66812345678"),
        ]);
        user.date_created = Some("2019-05-01T10:00:00.123Z".into());
        user.ip = Some("10.0.0.1".into());

        let summary = summarize(EventsDataset::new(vec![user]), OutlierMethod::default());
        build_report(&summary, &BucketSpec::default(), engagement, None).unwrap()
    }

    #[test]
    fn test_timeline_row() {
        let output = format_human_output(&report(None));

        assert!(output.contains("Eventline Results"));
        assert!(output.contains("Timeline (3 buckets of 5000 ms, zero-aligned)"));
        assert!(output.contains("2019-05-01T10:00:00"));
        assert!(output.contains("66812345678"));
        assert!(output.contains("|  1  ·  1|"));
        assert!(!output.contains("Total Views"));
    }

    #[test]
    fn test_engagement_header() {
        let engagement = EngagementSummary {
            from_date: Some("2019-05-01T00:00:00Z".into()),
            to_date: Some("2019-05-02T00:00:00Z".into()),
            with_engagement: 25,
            total: 200,
        };
        let output = format_human_output(&report(Some(engagement)));

        assert!(output.contains("Total Views: 200"));
        assert!(output.contains("Engagement Rate: 13%"));
        assert!(output.contains("2019-05-01 00:00:00 2019-05-02 00:00:00"));
    }

    #[test]
    fn test_empty_report() {
        let summary = summarize(EventsDataset::default(), OutlierMethod::default());
        let report = build_report(&summary, &BucketSpec::default(), None, None).unwrap();
        let output = format_human_output(&report);

        assert!(output.contains("No users."));
        assert!(output.contains("min: -  max: -"));
        assert!(output.contains("median: -"));
    }

    #[test]
    fn test_fmt_ms() {
        assert_eq!(fmt_ms(12.34), "12.3 ms");
        assert_eq!(fmt_ms(f64::NAN), "-");
        assert_eq!(fmt_ms(f64::NEG_INFINITY), "-");
    }
}
