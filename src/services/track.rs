// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Track reconstruction from stream channels and GPX persistence.

use crate::error::{Result, SyncError};
use crate::models::{ActivitySummary, StreamSet, Track, TrackPoint};
use chrono::TimeDelta;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Build the track of one activity.
///
/// Returns `Ok(None)` when there is no position data (manual entries,
/// treadmill and gym sessions). A missing altitude channel means elevation
/// 0 everywhere; a missing time channel means one second per sample. The
/// channels used must then have identical lengths; nothing is truncated
/// or padded.
pub fn build_track(activity: &ActivitySummary, streams: &StreamSet) -> Result<Option<Track>> {
    let Some(positions) = streams.positions() else {
        tracing::info!(
            activity_id = activity.id,
            name = %activity.name,
            "No GPS data, skipping track"
        );
        return Ok(None);
    };
    let len = positions.len();

    let elevations: Cow<'_, [f64]> = match &streams.altitude {
        Some(channel) => Cow::Borrowed(channel.data.as_slice()),
        None => Cow::Owned(vec![0.0; len]),
    };
    let offsets: Cow<'_, [i64]> = match &streams.time {
        Some(channel) => Cow::Borrowed(channel.data.as_slice()),
        None => Cow::Owned((0..len as i64).collect()),
    };

    if elevations.len() != len || offsets.len() != len {
        return Err(SyncError::TrackChannelMismatch {
            activity_id: activity.id,
            positions: len,
            elevations: elevations.len(),
            offsets: offsets.len(),
        });
    }

    let start = activity
        .start_time()
        .ok_or_else(|| SyncError::InvalidStartDate(activity.start_date.clone()))?;

    let points = positions
        .iter()
        .zip(elevations.iter())
        .zip(offsets.iter())
        .map(|((&[latitude, longitude], &elevation), &offset)| {
            let time = TimeDelta::try_seconds(offset)
                .and_then(|delta| start.checked_add_signed(delta))
                .ok_or(SyncError::InvalidTimeOffset {
                    activity_id: activity.id,
                    offset,
                })?;
            Ok(TrackPoint {
                latitude,
                longitude,
                elevation,
                time,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(Track {
        activity_id: activity.id,
        name: activity.name.clone(),
        sport_type: activity.kind().map(str::to_string),
        points,
    }))
}

/// Location of the track file for an activity.
pub fn track_path(dir: &Path, activity_id: u64) -> PathBuf {
    dir.join(format!("{}.gpx", activity_id))
}

/// Whether the activity's track has already been written.
pub fn track_exists(dir: &Path, activity_id: u64) -> bool {
    track_path(dir, activity_id).exists()
}

/// Write the track as `<dir>/<activity_id>.gpx`.
///
/// The file only appears under its final name once fully written.
pub fn write_track(dir: &Path, track: &Track) -> Result<PathBuf> {
    let path = track_path(dir, track.activity_id);
    let temp_path = path.with_extension("gpx.tmp");

    fs::create_dir_all(dir).map_err(|e| write_error(&path, e))?;

    let file = File::create(&temp_path).map_err(|e| write_error(&path, e))?;
    let mut writer = BufWriter::new(file);
    gpx::write(&track.to_gpx(), &mut writer).map_err(|e| write_error(&path, e))?;
    writer.flush().map_err(|e| write_error(&path, e))?;
    drop(writer);

    fs::rename(&temp_path, &path).map_err(|e| write_error(&path, e))?;

    tracing::debug!(
        activity_id = track.activity_id,
        points = track.points.len(),
        path = %path.display(),
        "Track written"
    );
    Ok(path)
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> SyncError {
    SyncError::TrackWrite(format!("{}: {}", path.display(), e))
}
