// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync error types.
//!
//! Fatal errors abort the run before the dataset merge. Per-activity errors
//! are logged by the orchestrator and the loop moves on to the next activity.

use std::path::PathBuf;

/// Error type for a synchronization run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("No stored Strava credential at {0}; re-authenticate out of band")]
    CredentialMissing(PathBuf),

    #[error("Token refresh failed: {0}")]
    CredentialRefresh(String),

    #[error("Failed to fetch streams for activity {activity_id}: {message}")]
    ActivityFetch { activity_id: u64, message: String },

    #[error(
        "Channel length mismatch for activity {activity_id}: \
         latlng={positions}, altitude={elevations}, time={offsets}"
    )]
    TrackChannelMismatch {
        activity_id: u64,
        positions: usize,
        elevations: usize,
        offsets: usize,
    },

    #[error("Invalid activity start date: {0}")]
    InvalidStartDate(String),

    #[error("Time offset {offset}s out of range for activity {activity_id}")]
    InvalidTimeOffset { activity_id: u64, offset: i64 },

    #[error("Failed to write track: {0}")]
    TrackWrite(String),

    #[error("Failed to persist dataset: {0}")]
    DatasetPersist(String),

    #[error("Failed to load dataset: {0}")]
    DatasetLoad(String),

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// Marker message for rate-limit responses.
    pub const STRAVA_RATE_LIMIT: &'static str = "Rate limit exceeded";
    /// Marker message for rejected access tokens.
    pub const STRAVA_TOKEN_ERROR: &'static str = "Token expired or invalid";

    /// Whether this error only affects the activity being processed.
    pub fn is_per_activity(&self) -> bool {
        matches!(
            self,
            SyncError::ActivityFetch { .. }
                | SyncError::TrackChannelMismatch { .. }
                | SyncError::InvalidStartDate(_)
                | SyncError::InvalidTimeOffset { .. }
                | SyncError::TrackWrite(_)
        )
    }
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
