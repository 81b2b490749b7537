use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// The server clock, in machine and human form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatetimeReport {
    /// RFC 3339 timestamp.
    pub datetime: String,
    /// Sentence that gets folded into the model prompt.
    pub message: String,
}

pub fn report_at<Tz: TimeZone>(now: DateTime<Tz>) -> DatetimeReport
where
    Tz::Offset: std::fmt::Display,
{
    DatetimeReport {
        datetime: now.to_rfc3339(),
        message: format!("Waktu server: {}", now.format("%Y-%m-%d %H:%M:%S")),
    }
}

pub fn now() -> DatetimeReport {
    report_at(Local::now())
}
