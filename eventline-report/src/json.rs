//! JSON Output

use crate::report::Report;
use eventline_core::EventSummary;

/// Generate a prettified JSON report.
///
/// Non-finite statistics (the extremes and median of an empty series) are
/// written as `null`.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Prettified JSON of the pipeline result: sorted `users` plus the flattened
/// statistics.
pub fn generate_summary_json(summary: &EventSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}
