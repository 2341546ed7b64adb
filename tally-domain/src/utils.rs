use chrono::{DateTime, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar date (UTC) of a Unix timestamp in seconds.
pub fn date_for_timestamp(seconds: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(seconds, 0).map(|at| at.format(DATE_FORMAT).to_string())
}
