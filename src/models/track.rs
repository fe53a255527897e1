// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Reconstructed GPS track and its GPX representation.

use crate::time_utils::to_offset_datetime;
use chrono::{DateTime, Utc};
use geo::{BoundingRect, LineString, Point, Rect};

const GPX_CREATOR: &str = "strava-sync";

/// One geolocated, timestamped sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in meters (0 when the activity has no altitude channel)
    pub elevation: f64,
    /// Activity start plus the sample's offset
    pub time: DateTime<Utc>,
}

/// Ordered point sequence for one activity (one track, one segment).
#[derive(Debug, Clone)]
pub struct Track {
    pub activity_id: u64,
    pub name: String,
    pub sport_type: Option<String>,
    pub points: Vec<TrackPoint>,
}

impl Track {
    /// Bounding box of all points (x = longitude, y = latitude).
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.line().bounding_rect()
    }

    /// Track as a geo line string in (lon, lat) order.
    pub fn line(&self) -> LineString<f64> {
        self.points
            .iter()
            .map(|p| (p.longitude, p.latitude))
            .collect::<Vec<_>>()
            .into()
    }

    /// Build the GPX document: a single `trk` holding a single `trkseg`.
    pub fn to_gpx(&self) -> gpx::Gpx {
        let mut segment = gpx::TrackSegment::new();
        segment.points = self
            .points
            .iter()
            .map(|p| {
                let mut waypoint = gpx::Waypoint::new(Point::new(p.longitude, p.latitude));
                waypoint.elevation = Some(p.elevation);
                waypoint.time = to_offset_datetime(p.time).map(gpx::Time::from);
                waypoint
            })
            .collect();

        let mut track = gpx::Track::new();
        if !self.name.is_empty() {
            track.name = Some(self.name.clone());
        }
        track.type_ = self.sport_type.clone();
        track.segments.push(segment);

        let metadata = gpx::Metadata {
            time: self
                .points
                .first()
                .and_then(|p| to_offset_datetime(p.time))
                .map(gpx::Time::from),
            bounds: self.bounds(),
            ..Default::default()
        };

        gpx::Gpx {
            version: gpx::GpxVersion::Gpx11,
            creator: Some(GPX_CREATOR.to_string()),
            metadata: Some(metadata),
            tracks: vec![track],
            ..Default::default()
        }
    }
}
