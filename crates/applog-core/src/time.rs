//! Timestamp formatting for rendered records.

use chrono::{DateTime, Local, TimeZone};

/// Layout of `{timestamp}`: local date and time with milliseconds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Render a timestamp the way every formatter prints `{timestamp}`.
pub fn format_timestamp<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time.
pub fn now() -> DateTime<Local> {
    Local::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_format_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(7, 5, 3, 42)
            .unwrap()
            .and_utc();
        assert_eq!(format_timestamp(&ts), "2024-03-09 07:05:03,042");
    }

    #[test]
    fn test_now_is_recent() {
        let local = now();
        let diff = Utc::now().signed_duration_since(local.with_timezone(&Utc));
        assert!(diff.num_seconds().abs() < 5);
    }
}
