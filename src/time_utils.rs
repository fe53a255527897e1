// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Strava start dates look like `2026-02-04T12:00:00Z`.
const STRAVA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a Strava UTC timestamp (whole seconds, `Z` suffix).
pub fn parse_strava_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, STRAVA_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Convert to the `time` crate's representation (used by the GPX writer).
pub fn to_offset_datetime(date: DateTime<Utc>) -> Option<time::OffsetDateTime> {
    time::OffsetDateTime::from_unix_timestamp(date.timestamp()).ok()
}
