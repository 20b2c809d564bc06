//! CSV Output
//!
//! One line per user per bucket.

use crate::report::Report;
use csv::Writer;

const HEADER: [&str; 9] = [
    "user",
    "date_created",
    "ip",
    "msisdn",
    "bucket",
    "from_ms",
    "to_ms",
    "count",
    "classification",
];

/// Generate a CSV timeline report
pub fn generate_csv_report(report: &Report) -> Result<String, csv::Error> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for (user_idx, row) in report.timeline.iter().enumerate() {
        let user = user_idx.to_string();
        for bucket in &row.buckets {
            writer.write_record([
                user.as_str(),
                row.date_created.as_str(),
                row.ip.as_str(),
                row.msisdn.as_deref().unwrap_or_default(),
                bucket.index.to_string().as_str(),
                bucket.from.to_string().as_str(),
                bucket.to.to_string().as_str(),
                bucket.count.to_string().as_str(),
                bucket.classification.trim(),
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
