// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for timestamps stored on recipe documents.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 with millisecond precision and a `Z` suffix.
///
/// Fixed width, so stored timestamps sort lexicographically.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time, formatted for storage.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_width_ordering() {
        let early = format_utc_rfc3339(Utc.with_ymd_and_hms(2024, 1, 9, 8, 0, 0).unwrap());
        let late = format_utc_rfc3339(Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap());
        assert_eq!(early, "2024-01-09T08:00:00.000Z");
        assert!(early < late);
    }
}
