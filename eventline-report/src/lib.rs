#![warn(missing_docs)]
//! Eventline Report - Reporting and Timeline Output
//!
//! Generates various output formats:
//! - JSON (machine-readable, full report or pipeline summary)
//! - CSV (one line per user per bucket)
//!
//! Human-readable terminal output lives in the CLI.

mod csv_report;
mod engagement;
mod json;
mod report;
mod timeline;

pub use csv_report::generate_csv_report;
pub use engagement::{EngagementError, EngagementSummary, format_date};
pub use json::{generate_json_report, generate_summary_json};
pub use report::{
    Report, ReportConfig, ReportMeta, ReportSummary, SCHEMA_VERSION, build_report,
};
pub use timeline::{UserTimeline, bucket_detail, find_msisdn};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
