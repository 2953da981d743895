// Weekly recurrence
//
// A weekly series is expanded into concrete dates up front; each date becomes
// an independent event row.

use chrono::{DateTime, Duration, Utc};

/// Upper bound on weeks generated by one request (one year).
pub const MAX_WEEKS: u32 = 52;

/// Dates for `weeks` consecutive weekly runs starting at `start`.
pub fn weekly_dates(start: DateTime<Utc>, weeks: u32) -> Vec<DateTime<Utc>> {
    (0..weeks)
        .map(|week| start + Duration::days(7 * i64::from(week)))
        .collect()
}
