//! Capture log entries.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::Serialize;

use super::UserId;

/// One immutable line of a user's capture history.
///
/// `points_awarded` is a snapshot taken at capture time; later catalog
/// changes never rewrite it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureEntry {
    pub submitter: UserId,
    pub species: String,
    pub points_awarded: i64,
    pub captured_at: NaiveDateTime,
}

/// A capture about to be appended to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCapture {
    pub submitter: UserId,
    pub species: String,
    pub points_awarded: i64,
    pub captured_at: NaiveDateTime,
    /// Whether the submitter's score is bumped by `points_awarded`.
    pub add_to_score: bool,
}

/// Truncate a clock reading to the log's second resolution.
pub fn capture_timestamp(now: DateTime<Utc>) -> NaiveDateTime {
    now.trunc_subsecs(0).naive_utc()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn timestamps_drop_subsecond_precision() {
        let now = Utc
            .with_ymd_and_hms(2026, 10, 16, 9, 15, 30)
            .single()
            .expect("valid timestamp")
            .with_nanosecond(987_654_321)
            .expect("valid nanos");

        let stamp = capture_timestamp(now);

        assert_eq!(stamp.nanosecond(), 0);
        assert_eq!(stamp.second(), 30);
    }
}
