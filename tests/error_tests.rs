// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use strava_sync::error::SyncError;

#[test]
fn test_io_errors_are_fatal() {
    let err: SyncError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
    assert!(!err.is_per_activity());
    assert!(err.to_string().contains("denied"));
}

#[test]
fn test_start_date_and_write_errors_skip_activity() {
    assert!(SyncError::InvalidStartDate("not a date".to_string()).is_per_activity());
    assert!(SyncError::TrackWrite("1.gpx: disk full".to_string()).is_per_activity());
}
