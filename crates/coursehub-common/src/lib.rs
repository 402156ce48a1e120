mod course;
mod lecture;
mod response;
mod schema;

pub use course::*;
pub use lecture::*;
pub use response::*;
pub use schema::*;

use bson::DateTime;
use chrono::{SecondsFormat, Utc};

/// Seconds since the unix epoch.
pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Fallback for records stored without `createdAt`/`updatedAt`.
pub(crate) fn epoch() -> DateTime {
    DateTime::from_millis(0)
}

/// ISO 8601 with milliseconds, e.g. `2024-03-01T12:00:00.000Z`.
pub fn format_timestamp(timestamp: DateTime) -> String {
    timestamp
        .to_chrono()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
