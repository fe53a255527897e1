// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity summary model for the local dataset.

use crate::time_utils::parse_strava_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Activity summary as returned by the activity list endpoint.
///
/// Only the fields the sync engine needs are typed. Everything else Strava
/// sends is kept in `extra` so a stored row carries the full remote record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    #[serde(default)]
    pub name: String,
    /// Sport type (Run, TrailRun, Ride, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_type: Option<String>,
    /// Legacy activity type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    /// Start date/time (ISO 8601, UTC, `Z` suffix)
    pub start_date: String,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_heartrate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_heartrate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_cadence: Option<f64>,
    /// Device name (e.g. "Garmin Forerunner 265")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gear_id: Option<String>,
    /// `[lat, lng]`, empty for activities without GPS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_latlng: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_latlng: Option<Vec<f64>>,
    /// Remaining remote fields, stored verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActivitySummary {
    /// Parsed start time, if the remote value is well formed.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        parse_strava_timestamp(&self.start_date)
    }

    /// Sport type, falling back to the legacy `type` field.
    pub fn kind(&self) -> Option<&str> {
        self.sport_type
            .as_deref()
            .or(self.activity_type.as_deref())
    }

    /// Start coordinate as `(lat, lng)`.
    pub fn start_point(&self) -> Option<(f64, f64)> {
        lat_lng(self.start_latlng.as_deref())
    }

    /// End coordinate as `(lat, lng)`.
    pub fn end_point(&self) -> Option<(f64, f64)> {
        lat_lng(self.end_latlng.as_deref())
    }
}

fn lat_lng(pair: Option<&[f64]>) -> Option<(f64, f64)> {
    match pair? {
        [lat, lng] => Some((*lat, *lng)),
        _ => None,
    }
}
